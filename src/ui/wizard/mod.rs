//! Listing wizard screen: key handling and rendering on top of `WizardController`

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{widgets::ListState, Frame};
use tracing::debug;

use crate::api::{ApiError, CreatedListing, Thumbnails};
use crate::draft::ServiceType;
use crate::photos::{PhotoFile, SLOT_COUNT};
use crate::submission::SubmitError;
use crate::ui::form_field::FormField;
use crate::wizard::{Field, Screen, ScreenForm, WizardController};

pub mod steps;
pub mod types;

pub use types::*;

#[cfg(test)]
mod tests;

pub struct WizardScreen {
    pub controller: WizardController,
    /// Highlighted row on the service type list
    pub(crate) type_state: ListState,
    /// Index into the current screen's field table
    pub(crate) focus: usize,
    pub(crate) option_field: FormField,
    pub(crate) price_field: FormField,
    pub(crate) title_field: FormField,
    pub(crate) description_field: FormField,
    /// Highlighted photo slot
    pub(crate) slot_state: ListState,
    /// Path prompt for the highlighted slot, while open
    pub(crate) path_input: Option<FormField>,
    /// Slot whose file is being read in the background
    pub(crate) loading_slot: Option<usize>,
    pub(crate) thumbnails: Thumbnails,
    pub status: Option<StatusMessage>,
    /// Waiting for `y` to confirm discarding the draft
    pub confirm_discard: bool,
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Expand a leading `~/` to the home directory
fn expand_path(raw: &str) -> PathBuf {
    match (raw.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}

impl WizardScreen {
    pub fn new(controller: WizardController) -> Self {
        let mut type_state = ListState::default();
        type_state.select(Some(0));

        let mut slot_state = ListState::default();
        slot_state.select(Some(0));

        let mut screen = Self {
            controller,
            type_state,
            focus: 0,
            option_field: FormField::choice(Vec::new()),
            price_field: FormField::text_input("R$ 0,00", Some(20)),
            title_field: FormField::text_input("Ex.: Pintura de sala completa", Some(80)),
            description_field: FormField::text_area("What is included, materials, timing"),
            slot_state,
            path_input: None,
            loading_slot: None,
            thumbnails: Thumbnails::new(),
            status: None,
            confirm_discard: false,
        };
        let form = screen.controller.form();
        screen.apply_form(form);
        screen
    }

    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.screen().fields().get(self.focus).copied()
    }

    pub fn set_thumbnails(&mut self, thumbnails: Thumbnails) {
        self.thumbnails = thumbnails;
    }

    /// Repopulate the inputs of the screen being entered
    pub(crate) fn apply_form(&mut self, form: ScreenForm) {
        self.focus = 0;
        match form.screen {
            Screen::SelectType => {
                let index = form
                    .service_type
                    .and_then(|t| ServiceType::all().iter().position(|s| *s == t))
                    .unwrap_or(0);
                self.type_state.select(Some(index));
            }
            Screen::Detail(service_type) => {
                self.option_field = FormField::choice(
                    service_type
                        .options()
                        .iter()
                        .map(|o| (o.id.to_string(), o.label.to_string()))
                        .collect(),
                );
                self.option_field
                    .set_value(form.selected_option.as_deref().unwrap_or_default());
                self.price_field.set_value(&form.price);
                self.title_field.set_value(&form.title);
                self.description_field.set_value(&form.description);
            }
            Screen::Photos => {
                if self.slot_state.selected().is_none() {
                    self.slot_state.select(Some(0));
                }
            }
        }
        debug!(screen = %form.screen, "Restored screen inputs");
    }

    fn highlighted_type(&self) -> Option<ServiceType> {
        self.type_state
            .selected()
            .and_then(|i| ServiceType::all().get(i).copied())
    }

    fn highlighted_slot(&self) -> usize {
        self.slot_state.selected().unwrap_or(0).min(SLOT_COUNT - 1)
    }

    fn go_forward(&mut self) {
        match self.controller.forward() {
            Ok(form) => {
                self.status = None;
                self.apply_form(form);
            }
            Err(e) => self.status = Some(StatusMessage::error(e.to_string())),
        }
    }

    fn go_back(&mut self) {
        let form = self.controller.back();
        self.status = None;
        self.apply_form(form);
    }

    /// Handle a key press (Ctrl+C quits from anywhere)
    pub fn handle_key(&mut self, key: KeyEvent) -> WizardResult {
        if is_ctrl(&key, 'c') {
            return WizardResult::Quit;
        }

        if self.confirm_discard {
            self.confirm_discard = false;
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.controller.discard();
                self.path_input = None;
                self.loading_slot = None;
                let form = self.controller.form();
                self.apply_form(form);
                self.status = Some(StatusMessage::info("Draft discarded"));
            } else {
                self.status = None;
            }
            return WizardResult::Continue;
        }

        if is_ctrl(&key, 'x') {
            self.confirm_discard = true;
            self.status = Some(StatusMessage::info(
                "Discard this draft? Press y to confirm, any other key to keep it",
            ));
            return WizardResult::Continue;
        }

        if self.path_input.is_some() {
            return self.handle_path_key(key);
        }

        match self.screen() {
            Screen::SelectType => self.handle_select_type_key(key),
            Screen::Detail(_) => self.handle_detail_key(key),
            Screen::Photos => self.handle_photos_key(key),
        }
    }

    fn handle_select_type_key(&mut self, key: KeyEvent) -> WizardResult {
        let len = ServiceType::all().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return WizardResult::Quit,
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.type_state.selected().map_or(0, |i| (i + 1) % len);
                self.type_state.select(Some(i));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self
                    .type_state
                    .selected()
                    .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
                self.type_state.select(Some(i));
            }
            KeyCode::Char(' ') => {
                if let Some(t) = self.highlighted_type() {
                    self.controller.select_service_type(t);
                }
            }
            KeyCode::Enter | KeyCode::Right => {
                if let Some(t) = self.highlighted_type() {
                    self.controller.select_service_type(t);
                }
                self.go_forward();
            }
            _ => {}
        }
        WizardResult::Continue
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> WizardResult {
        let field_count = self.screen().fields().len();
        match key.code {
            KeyCode::Esc => {
                self.go_back();
                return WizardResult::Continue;
            }
            KeyCode::Tab => {
                self.focus = (self.focus + 1) % field_count;
                return WizardResult::Continue;
            }
            KeyCode::BackTab => {
                self.focus = if self.focus == 0 {
                    field_count - 1
                } else {
                    self.focus - 1
                };
                return WizardResult::Continue;
            }
            KeyCode::Enter if self.focused_field() != Some(Field::Description) => {
                self.go_forward();
                return WizardResult::Continue;
            }
            _ => {}
        }

        match self.focused_field() {
            Some(Field::Option) => {
                if self.option_field.handle_key(key) {
                    let id = self.option_field.value();
                    self.controller.select_option(&id);
                }
            }
            Some(field @ Field::Price) => {
                if self.price_field.handle_key(key) {
                    self.controller.set_text(field, self.price_field.value());
                }
            }
            Some(field @ Field::Title) => {
                if self.title_field.handle_key(key) {
                    self.controller.set_text(field, self.title_field.value());
                }
            }
            Some(field @ Field::Description) => {
                if self.description_field.handle_key(key) {
                    self.controller
                        .set_text(field, self.description_field.value());
                }
            }
            _ => {}
        }
        WizardResult::Continue
    }

    fn handle_photos_key(&mut self, key: KeyEvent) -> WizardResult {
        if is_ctrl(&key, 's') {
            return self.submit();
        }

        match key.code {
            KeyCode::Esc => self.go_back(),
            KeyCode::Down | KeyCode::Char('j') => {
                let i = (self.highlighted_slot() + 1) % SLOT_COUNT;
                self.slot_state.select(Some(i));
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let i = (self.highlighted_slot() + SLOT_COUNT - 1) % SLOT_COUNT;
                self.slot_state.select(Some(i));
            }
            KeyCode::Enter | KeyCode::Char('a') => {
                if self.loading_slot.is_some() {
                    self.status = Some(StatusMessage::info("Still reading the previous photo"));
                } else {
                    self.path_input = Some(FormField::text_input("/path/to/photo.jpg", None));
                }
            }
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => {
                let slot = self.highlighted_slot();
                match self.controller.clear_photo(slot) {
                    Ok(()) => self.status = None,
                    Err(e) => self.status = Some(StatusMessage::error(e.to_string())),
                }
            }
            KeyCode::Char('p') => return self.submit(),
            _ => {}
        }
        WizardResult::Continue
    }

    fn handle_path_key(&mut self, key: KeyEvent) -> WizardResult {
        match key.code {
            KeyCode::Esc => {
                self.path_input = None;
                WizardResult::Continue
            }
            KeyCode::Enter => {
                let raw = self
                    .path_input
                    .take()
                    .map(|f| f.value())
                    .unwrap_or_default();
                let raw = raw.trim();
                if raw.is_empty() {
                    self.status = Some(StatusMessage::error("Enter the path of an image file"));
                    return WizardResult::Continue;
                }

                let slot = self.highlighted_slot();
                let path = expand_path(raw);
                self.loading_slot = Some(slot);
                self.status = Some(StatusMessage::info(format!(
                    "Reading {} into photo {}",
                    path.display(),
                    slot + 1
                )));
                WizardResult::LoadPhoto { slot, path }
            }
            _ => {
                if let Some(input) = self.path_input.as_mut() {
                    input.handle_key(key);
                }
                WizardResult::Continue
            }
        }
    }

    fn submit(&mut self) -> WizardResult {
        match self.controller.begin_submission() {
            Ok(payload) => {
                self.status = Some(StatusMessage::info("Publishing listing..."));
                WizardResult::Submit(payload)
            }
            Err(SubmitError::Invalid(err)) => {
                let form = self.controller.form();
                self.apply_form(form);
                if let Some(pos) = self.screen().fields().iter().position(|f| *f == err.field()) {
                    self.focus = pos;
                }
                self.status = Some(StatusMessage::error(err.to_string()));
                WizardResult::Continue
            }
            Err(err) => {
                self.status = Some(StatusMessage::info(err.to_string()));
                WizardResult::Continue
            }
        }
    }

    /// A background photo read started under `generation` finished
    pub fn photo_loaded(
        &mut self,
        generation: u64,
        slot: usize,
        result: Result<PhotoFile, String>,
    ) {
        if !self.controller.is_current(generation) {
            debug!(slot, generation, "Dropping photo read for a discarded draft");
            return;
        }
        self.loading_slot = None;
        let file = match result {
            Ok(file) => file,
            Err(message) => {
                self.status = Some(StatusMessage::error(message));
                return;
            }
        };

        let name = file.name.clone();
        match self.controller.assign_photo(slot, file) {
            Ok(()) => {
                self.status = Some(StatusMessage::success(format!(
                    "Added {} as photo {}",
                    name,
                    slot + 1
                )));
            }
            Err(e) => self.status = Some(StatusMessage::error(e.to_string())),
        }
    }

    /// The backend answered a submission started under `generation`
    pub fn submission_finished(
        &mut self,
        generation: u64,
        result: Result<CreatedListing, ApiError>,
    ) {
        if !self.controller.is_current(generation) {
            debug!(generation, "Answer for a discarded draft");
            if let Ok(created) = result {
                self.status = Some(StatusMessage::info(format!(
                    "The discarded draft was published anyway (id {})",
                    created.id
                )));
            }
            return;
        }

        match self.controller.finish_submission(result) {
            Ok(created) => {
                let form = self.controller.form();
                self.apply_form(form);
                self.slot_state.select(Some(0));
                self.loading_slot = None;
                self.status = Some(StatusMessage::success(format!(
                    "Listing published (id {})",
                    created.id
                )));
            }
            Err(e) => {
                self.status = Some(StatusMessage::error(format!("Could not publish: {}", e)));
            }
        }
    }

    /// Render the wizard screen
    pub fn render(&mut self, frame: &mut Frame) {
        match self.screen() {
            Screen::SelectType => self.render_select_type_step(frame),
            Screen::Detail(service_type) => self.render_detail_step(frame, service_type),
            Screen::Photos => self.render_photos_step(frame),
        }
    }
}
