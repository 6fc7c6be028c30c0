use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ApiError, CreatedListing, ListingApi, Thumbnails};
use crate::config::Config;
use crate::draft::{DraftStore, SessionStorage};
use crate::photos::PhotoFile;
use crate::submission::ListingPayload;
use crate::ui::{TerminalGuard, WizardResult, WizardScreen};
use crate::wizard::WizardController;

/// Completions of background work, delivered to the event loop
///
/// Draft-bound work carries the draft generation it was started under.
#[derive(Debug)]
pub enum AppEvent {
    Thumbnails(Result<Thumbnails, ApiError>),
    PhotoLoaded {
        generation: u64,
        slot: usize,
        result: Result<PhotoFile, String>,
    },
    Submitted {
        generation: u64,
        result: Result<CreatedListing, ApiError>,
    },
}

pub struct App {
    config: Config,
    wizard: WizardScreen,
    api: Arc<dyn ListingApi>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, storage: Arc<dyn SessionStorage>, api: Arc<dyn ListingApi>) -> Self {
        let store = DraftStore::new(storage).with_photo_limit(config.photos.max_bytes);
        let wizard = WizardScreen::new(WizardController::new(store));
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            config,
            wizard,
            api,
            events_tx,
            events_rx,
            should_quit: false,
        }
    }

    pub fn wizard(&self) -> &WizardScreen {
        &self.wizard
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        let guard = TerminalGuard::new()?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;

        self.spawn_thumbnail_fetch();

        let tick_rate = Duration::from_millis(self.config.ui.tick_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| self.wizard.render(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }

            self.drain_events();
        }

        guard.restore();
        terminal.show_cursor()?;
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.wizard.handle_key(key) {
            WizardResult::Continue => {}
            WizardResult::Quit => {
                info!("Leaving wizard, draft kept in session storage");
                self.should_quit = true;
            }
            WizardResult::LoadPhoto { slot, path } => self.spawn_photo_read(slot, path),
            WizardResult::Submit(payload) => self.spawn_submission(payload),
        }
    }

    /// Apply every completion that has arrived, without waiting
    fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait for the next background completion
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Thumbnails(Ok(thumbnails)) => {
                debug!(count = thumbnails.len(), "Service thumbnails loaded");
                self.wizard.set_thumbnails(thumbnails);
            }
            AppEvent::Thumbnails(Err(e)) => {
                // The wizard works without thumbnails
                warn!(error = %e, "Could not load service thumbnails");
            }
            AppEvent::PhotoLoaded {
                generation,
                slot,
                result,
            } => self.wizard.photo_loaded(generation, slot, result),
            AppEvent::Submitted { generation, result } => {
                self.wizard.submission_finished(generation, result);
            }
        }
    }

    fn spawn_thumbnail_fetch(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.fetch_thumbnails().await;
            let _ = tx.send(AppEvent::Thumbnails(result));
        });
    }

    fn spawn_photo_read(&self, slot: usize, path: PathBuf) {
        let generation = self.wizard.controller.generation();
        debug!(slot, generation, path = %path.display(), "Reading photo");
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = PhotoFile::read(&path)
                .await
                .map_err(|e| format!("Could not read {}: {}", path.display(), e));
            let _ = tx.send(AppEvent::PhotoLoaded {
                generation,
                slot,
                result,
            });
        });
    }

    fn spawn_submission(&self, payload: ListingPayload) {
        info!(
            fields = payload.fields.len(),
            photos = payload.photos.len(),
            "Publishing listing"
        );
        let generation = self.wizard.controller.generation();
        let api = Arc::clone(&self.api);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.create_listing(payload).await;
            let _ = tx.send(AppEvent::Submitted { generation, result });
        });
    }
}
