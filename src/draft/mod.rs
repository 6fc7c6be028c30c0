//! Listing draft model and its session-storage layout
//!
//! A `ListingDraft` is the in-progress listing the wizard edits. It is owned by
//! a single `WizardController`; the `DraftStore` mirrors its scalar fields into
//! session storage so input survives navigation and restarts.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::photos::{PhotoSlots, SLOT_COUNT};

pub mod storage;
pub mod store;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
pub use store::{DraftStore, DRAFT_KEY};

/// Kind of service a listing offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Assentamento,
    PinturaParedes,
    PinturaPortoes,
    Acabamentos,
}

/// A sub-option offered under a service type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOption {
    pub id: &'static str,
    pub label: &'static str,
}

const ASSENTAMENTO_OPTIONS: &[ServiceOption] = &[
    ServiceOption {
        id: "piso",
        label: "Piso",
    },
    ServiceOption {
        id: "azulejo",
        label: "Azulejo",
    },
    ServiceOption {
        id: "porcelanato",
        label: "Porcelanato",
    },
];

const PINTURA_PAREDES_OPTIONS: &[ServiceOption] = &[
    ServiceOption {
        id: "interna",
        label: "Pintura interna",
    },
    ServiceOption {
        id: "externa",
        label: "Pintura externa",
    },
    ServiceOption {
        id: "textura",
        label: "Textura / grafiato",
    },
];

const PINTURA_PORTOES_OPTIONS: &[ServiceOption] = &[
    ServiceOption {
        id: "ferro",
        label: "Portão de ferro",
    },
    ServiceOption {
        id: "madeira",
        label: "Portão de madeira",
    },
    ServiceOption {
        id: "aluminio",
        label: "Portão de alumínio",
    },
];

const ACABAMENTOS_OPTIONS: &[ServiceOption] = &[
    ServiceOption {
        id: "gesso",
        label: "Gesso",
    },
    ServiceOption {
        id: "rodape",
        label: "Rodapé",
    },
    ServiceOption {
        id: "massa-corrida",
        label: "Massa corrida",
    },
];

impl ServiceType {
    pub fn all() -> &'static [ServiceType] {
        &[
            ServiceType::Assentamento,
            ServiceType::PinturaParedes,
            ServiceType::PinturaPortoes,
            ServiceType::Acabamentos,
        ]
    }

    /// Stable identifier used in storage and by the backend
    pub fn id(&self) -> &'static str {
        match self {
            ServiceType::Assentamento => "assentamento",
            ServiceType::PinturaParedes => "pintura-paredes",
            ServiceType::PinturaPortoes => "pintura-portoes",
            ServiceType::Acabamentos => "acabamentos",
        }
    }

    /// Human-readable label sent in the listing payload
    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::Assentamento => "Assentamento",
            ServiceType::PinturaParedes => "Pintura de Paredes",
            ServiceType::PinturaPortoes => "Pintura de Portões",
            ServiceType::Acabamentos => "Acabamentos",
        }
    }

    pub fn options(&self) -> &'static [ServiceOption] {
        match self {
            ServiceType::Assentamento => ASSENTAMENTO_OPTIONS,
            ServiceType::PinturaParedes => PINTURA_PAREDES_OPTIONS,
            ServiceType::PinturaPortoes => PINTURA_PORTOES_OPTIONS,
            ServiceType::Acabamentos => ACABAMENTOS_OPTIONS,
        }
    }

    pub fn from_id(id: &str) -> Option<ServiceType> {
        Self::all().iter().copied().find(|t| t.id() == id)
    }

    pub fn option(&self, id: &str) -> Option<&'static ServiceOption> {
        self.options().iter().find(|o| o.id == id)
    }
}

impl std::fmt::Display for ServiceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// The listing being composed by the wizard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDraft {
    pub service_type: Option<ServiceType>,
    pub selected_option: Option<String>,
    /// Raw user input; normalized only at submission
    pub price: String,
    pub title: String,
    pub description: String,
    pub photos: PhotoSlots,
}

impl ListingDraft {
    /// Empty draft whose photo slots enforce `max_photo_bytes`
    pub fn with_photo_limit(max_photo_bytes: u64) -> Self {
        Self {
            photos: PhotoSlots::with_limit(max_photo_bytes),
            ..Self::default()
        }
    }

    /// Rebuild a draft from its persisted form.
    ///
    /// Photo bytes are never persisted, so every slot comes back empty.
    pub fn from_persisted(persisted: PersistedDraft, max_photo_bytes: u64) -> Self {
        let service_type = persisted.tipo_servico.as_deref().and_then(|id| {
            let parsed = ServiceType::from_id(id);
            if parsed.is_none() {
                warn!(tipo_servico = id, "Ignoring unknown service type in stored draft");
            }
            parsed
        });

        Self {
            service_type,
            selected_option: persisted.opcao_selecionada,
            price: persisted.valor,
            title: persisted.titulo,
            description: persisted.descricao,
            photos: PhotoSlots::with_limit(max_photo_bytes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.service_type.is_none()
            && self.selected_option.is_none()
            && self.price.is_empty()
            && self.title.is_empty()
            && self.description.is_empty()
            && self.photos.filled_count() == 0
    }
}

/// Presence marker stored in place of a photo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhotoMarker {
    #[serde(rename = "file")]
    File,
}

/// Session-storage layout of a draft (key `dadosAnuncio`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDraft {
    #[serde(default)]
    pub tipo_servico: Option<String>,
    #[serde(default)]
    pub opcao_selecionada: Option<String>,
    #[serde(default)]
    pub valor: String,
    #[serde(default)]
    pub titulo: String,
    #[serde(default)]
    pub descricao: String,
    #[serde(default = "empty_markers")]
    pub fotos: Vec<Option<PhotoMarker>>,
}

fn empty_markers() -> Vec<Option<PhotoMarker>> {
    vec![None; SLOT_COUNT]
}

impl Default for PersistedDraft {
    fn default() -> Self {
        Self {
            tipo_servico: None,
            opcao_selecionada: None,
            valor: String::new(),
            titulo: String::new(),
            descricao: String::new(),
            fotos: empty_markers(),
        }
    }
}

impl From<&ListingDraft> for PersistedDraft {
    fn from(draft: &ListingDraft) -> Self {
        Self {
            tipo_servico: draft.service_type.map(|t| t.id().to_string()),
            opcao_selecionada: draft.selected_option.clone(),
            valor: draft.price.clone(),
            titulo: draft.title.clone(),
            descricao: draft.description.clone(),
            fotos: draft
                .photos
                .markers()
                .iter()
                .map(|filled| filled.then_some(PhotoMarker::File))
                .collect(),
        }
    }
}
