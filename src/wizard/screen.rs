//! Wizard screens and the field set each one edits

use crate::draft::ServiceType;
use crate::photos::SLOT_COUNT;

/// One step of the listing wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Initial screen: pick a service type
    #[default]
    SelectType,
    /// Option, price, title and description for one service type
    Detail(ServiceType),
    /// Photo slots; the last screen before submission
    Photos,
}

/// An editable field of the draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ServiceType,
    Option,
    Price,
    Title,
    Description,
    Photo(usize),
}

const SELECT_TYPE_FIELDS: &[Field] = &[Field::ServiceType];

const DETAIL_FIELDS: &[Field] = &[Field::Option, Field::Price, Field::Title, Field::Description];

const PHOTO_FIELDS: &[Field; SLOT_COUNT] = &[
    Field::Photo(0),
    Field::Photo(1),
    Field::Photo(2),
    Field::Photo(3),
    Field::Photo(4),
    Field::Photo(5),
    Field::Photo(6),
    Field::Photo(7),
];

impl Screen {
    pub const INITIAL: Screen = Screen::SelectType;

    /// Fields shown on this screen, in focus order
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Screen::SelectType => SELECT_TYPE_FIELDS,
            Screen::Detail(_) => DETAIL_FIELDS,
            Screen::Photos => PHOTO_FIELDS,
        }
    }

    /// Stable identifier, e.g. `screen-detail-pintura-paredes`
    pub fn id(&self) -> String {
        match self {
            Screen::SelectType => "screen-select-type".to_string(),
            Screen::Detail(t) => format!("screen-detail-{}", t.id()),
            Screen::Photos => "screen-photos".to_string(),
        }
    }

    pub fn title(&self) -> String {
        match self {
            Screen::SelectType => "Choose a service".to_string(),
            Screen::Detail(t) => format!("{} details", t.label()),
            Screen::Photos => "Photos".to_string(),
        }
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        match self {
            Screen::Detail(t) => Some(*t),
            _ => None,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}

impl Field {
    fn base_key(&self) -> String {
        match self {
            Field::ServiceType => "tipo-servico".to_string(),
            Field::Option => "opcao".to_string(),
            Field::Price => "valor".to_string(),
            Field::Title => "titulo".to_string(),
            Field::Description => "descricao".to_string(),
            Field::Photo(i) => format!("foto-{}", i + 1),
        }
    }

    /// Field key namespaced by the screen's service type, e.g. `titulo-acabamentos`
    pub fn key(&self, screen: Screen) -> String {
        match screen.service_type() {
            Some(t) => format!("{}-{}", self.base_key(), t.id()),
            None => self.base_key(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Field::ServiceType => "Service type".to_string(),
            Field::Option => "Option".to_string(),
            Field::Price => "Price (R$)".to_string(),
            Field::Title => "Title".to_string(),
            Field::Description => "Description".to_string(),
            Field::Photo(i) => format!("Photo {}", i + 1),
        }
    }

    /// Free-text fields edited through a text input
    pub fn is_text(&self) -> bool {
        matches!(self, Field::Price | Field::Title | Field::Description)
    }
}
