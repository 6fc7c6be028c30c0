//! Wizard controller: owns the draft, its history and its persistence

use tracing::{debug, info, warn};

use super::{Field, NavigationError, Navigator, Screen};
use crate::api::{ApiError, CreatedListing, ListingApi};
use crate::draft::{DraftStore, ListingDraft, ServiceType};
use crate::photos::{PhotoError, PhotoFile, PhotoPreview, SLOT_COUNT};
use crate::submission::{self, ListingPayload, SubmitError};

/// Values to put back into the inputs of the screen being entered
///
/// Only the fields of `screen` are populated; everything else stays empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenForm {
    pub screen: Screen,
    pub service_type: Option<ServiceType>,
    pub selected_option: Option<String>,
    pub price: String,
    pub title: String,
    pub description: String,
    pub photos: [Option<PhotoPreview>; SLOT_COUNT],
}

impl ScreenForm {
    pub fn restore(screen: Screen, draft: &ListingDraft) -> Self {
        let mut form = ScreenForm {
            screen,
            ..Default::default()
        };
        for field in screen.fields() {
            match *field {
                Field::ServiceType => form.service_type = draft.service_type,
                Field::Option => form.selected_option = draft.selected_option.clone(),
                Field::Price => form.price = draft.price.clone(),
                Field::Title => form.title = draft.title.clone(),
                Field::Description => form.description = draft.description.clone(),
                Field::Photo(i) => {
                    if let Some(slot) = form.photos.get_mut(i) {
                        *slot = draft.photos.preview(i);
                    }
                }
            }
        }
        form
    }

    /// Text for a free-text field
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Price => &self.price,
            Field::Title => &self.title,
            Field::Description => &self.description,
            _ => "",
        }
    }
}

pub struct WizardController {
    draft: ListingDraft,
    navigator: Navigator,
    store: DraftStore,
    submitting: bool,
    /// Bumped whenever the draft is replaced; background work started under
    /// an older value must not touch the current draft
    generation: u64,
}

impl WizardController {
    /// Start on the initial screen with whatever draft the store holds
    pub fn new(store: DraftStore) -> Self {
        let draft = store.load();
        if !draft.is_empty() {
            info!(
                service_type = ?draft.service_type,
                "Restored listing draft from session"
            );
        }
        Self {
            draft,
            navigator: Navigator::new(),
            store,
            submitting: false,
            generation: 0,
        }
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    pub fn screen(&self) -> Screen {
        self.navigator.current()
    }

    pub fn history(&self) -> &[Screen] {
        self.navigator.history()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when work started under `generation` still belongs to this draft
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    fn start_over(&mut self) {
        self.draft = ListingDraft::with_photo_limit(self.store.max_photo_bytes());
        self.navigator.reset();
        self.submitting = false;
        self.generation += 1;
    }

    /// Restore pass for the current screen
    pub fn form(&self) -> ScreenForm {
        ScreenForm::restore(self.screen(), &self.draft)
    }

    fn persist(&self) {
        self.store.save(&self.draft);
    }

    pub fn select_service_type(&mut self, service_type: ServiceType) {
        if self.draft.service_type == Some(service_type) {
            return;
        }
        debug!(service_type = %service_type, "Service type selected");
        self.draft.service_type = Some(service_type);
        self.persist();
    }

    /// Select a sub-option; ids not offered by the current type are ignored
    pub fn select_option(&mut self, option_id: &str) -> bool {
        let valid = self
            .draft
            .service_type
            .and_then(|t| t.option(option_id))
            .is_some();
        if !valid {
            warn!(option = option_id, "Ignoring option not offered by the selected type");
            return false;
        }
        self.draft.selected_option = Some(option_id.to_string());
        self.persist();
        true
    }

    pub fn set_price(&mut self, value: impl Into<String>) {
        self.draft.price = value.into();
        self.persist();
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.draft.title = value.into();
        self.persist();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
        self.persist();
    }

    /// Update a free-text field by its table entry
    pub fn set_text(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Price => self.set_price(value),
            Field::Title => self.set_title(value),
            Field::Description => self.set_description(value),
            other => debug!(field = ?other, "Not a text field"),
        }
    }

    pub fn assign_photo(&mut self, index: usize, file: PhotoFile) -> Result<(), PhotoError> {
        self.draft.photos.assign(index, file)?;
        self.persist();
        Ok(())
    }

    pub fn clear_photo(&mut self, index: usize) -> Result<(), PhotoError> {
        if self.draft.photos.clear(index)?.is_some() {
            self.persist();
        }
        Ok(())
    }

    pub fn forward(&mut self) -> Result<ScreenForm, NavigationError> {
        let leaving = self.screen();
        let entered = self.navigator.forward(self.draft.service_type)?;
        self.persist();
        debug!(from = %leaving, to = %entered, "Navigated forward");
        Ok(self.form())
    }

    pub fn back(&mut self) -> ScreenForm {
        let leaving = self.screen();
        let entered = self.navigator.back();
        self.persist();
        debug!(from = %leaving, to = %entered, "Navigated back");
        self.form()
    }

    /// Drop the draft entirely and start over.
    ///
    /// An in-flight submission is forgotten; its answer will be stale.
    pub fn discard(&mut self) {
        self.store.clear();
        self.start_over();
        info!(generation = self.generation, "Listing draft discarded");
    }

    /// Validate and assemble the payload, marking a submission in flight.
    ///
    /// On a validation failure the draft is saved and the wizard is sent
    /// back to the screen holding the offending field.
    pub fn begin_submission(&mut self) -> Result<ListingPayload, SubmitError> {
        if self.submitting {
            warn!("Submission already in flight");
            return Err(SubmitError::InFlight);
        }

        match submission::assemble(&self.draft) {
            Ok(payload) => {
                self.submitting = true;
                Ok(payload)
            }
            Err(err) => {
                self.persist();
                let target = self.navigator.return_to(err.screen());
                info!(error = %err, screen = %target, "Submission blocked by validation");
                Err(err.into())
            }
        }
    }

    /// Apply the backend's answer to an in-flight submission.
    ///
    /// Success clears the stored draft and resets the wizard; any failure
    /// keeps everything so the user can retry.
    pub fn finish_submission(
        &mut self,
        result: Result<CreatedListing, ApiError>,
    ) -> Result<CreatedListing, SubmitError> {
        self.submitting = false;
        match result {
            Ok(created) => {
                info!(id = %created.id, "Listing published");
                self.store.clear();
                self.start_over();
                Ok(created)
            }
            Err(err) => {
                warn!(error = %err, "Listing not published, draft kept");
                Err(err.into())
            }
        }
    }

    pub async fn submit(&mut self, api: &dyn ListingApi) -> Result<CreatedListing, SubmitError> {
        let payload = self.begin_submission()?;
        let result = api.create_listing(payload).await;
        self.finish_submission(result)
    }
}
