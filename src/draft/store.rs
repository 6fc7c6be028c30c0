//! Draft persistence over session storage.
//!
//! Every failure here degrades to "no stored draft": the wizard must stay
//! usable when storage is missing, corrupt or read-only.

use std::sync::Arc;

use tracing::{debug, warn};

use super::storage::SessionStorage;
use super::{ListingDraft, PersistedDraft};
use crate::photos::DEFAULT_MAX_PHOTO_BYTES;

/// Session-storage key holding the draft
pub const DRAFT_KEY: &str = "dadosAnuncio";

pub struct DraftStore {
    storage: Arc<dyn SessionStorage>,
    max_photo_bytes: u64,
}

impl DraftStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }

    /// Photo size limit applied to drafts produced by `load`
    pub fn with_photo_limit(mut self, max_photo_bytes: u64) -> Self {
        self.max_photo_bytes = max_photo_bytes;
        self
    }

    pub fn max_photo_bytes(&self) -> u64 {
        self.max_photo_bytes
    }

    /// Read the persisted layout as stored, if present and well-formed
    pub fn load_persisted(&self) -> Option<PersistedDraft> {
        let raw = match self.storage.get_item(DRAFT_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "Session storage unavailable, starting with an empty draft");
                return None;
            }
        };

        match serde_json::from_str::<PersistedDraft>(&raw) {
            Ok(persisted) => Some(persisted),
            Err(e) => {
                warn!(error = %e, "Stored draft is malformed, starting with an empty draft");
                None
            }
        }
    }

    /// Current draft, or a fresh one when nothing usable is stored
    pub fn load(&self) -> ListingDraft {
        match self.load_persisted() {
            Some(persisted) => {
                debug!("Restored listing draft from session storage");
                ListingDraft::from_persisted(persisted, self.max_photo_bytes)
            }
            None => ListingDraft::with_photo_limit(self.max_photo_bytes),
        }
    }

    /// Persist the scalar fields and photo presence markers of `draft`
    pub fn save(&self, draft: &ListingDraft) {
        let persisted = PersistedDraft::from(draft);
        let raw = match serde_json::to_string(&persisted) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to serialize listing draft");
                return;
            }
        };

        if let Err(e) = self.storage.set_item(DRAFT_KEY, &raw) {
            warn!(error = %e, "Failed to persist listing draft");
        }
    }

    /// Remove the persisted draft entirely
    pub fn clear(&self) {
        if let Err(e) = self.storage.remove_item(DRAFT_KEY) {
            warn!(error = %e, "Failed to clear persisted listing draft");
        }
    }
}
