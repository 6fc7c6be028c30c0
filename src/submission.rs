//! Submission assembly: validation, price normalization and the multipart payload

use reqwest::multipart::{Form, Part};
use thiserror::Error;

use crate::api::ApiError;
use crate::draft::{ListingDraft, ServiceType};
use crate::wizard::{Field, Screen};

pub const FIELD_SERVICE_TYPE: &str = "tipoServico";
pub const FIELD_OPTION: &str = "opcao";
pub const FIELD_PRICE: &str = "valor";
pub const FIELD_TITLE: &str = "titulo";
pub const FIELD_DESCRIPTION: &str = "descricao";
pub const FIELD_PHOTOS: &str = "fotos";

/// Draft preconditions, checked in declaration order
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Choose a service type before publishing")]
    MissingServiceType,

    #[error("Choose one of the {} options", .0.label())]
    MissingOption(ServiceType),

    #[error("Give the listing a title")]
    MissingTitle(ServiceType),

    #[error("Describe the service before publishing")]
    MissingDescription(ServiceType),
}

impl ValidationError {
    /// Screen the user is sent back to so the field can be fixed
    pub fn screen(&self) -> Screen {
        match self {
            ValidationError::MissingServiceType => Screen::SelectType,
            ValidationError::MissingOption(t)
            | ValidationError::MissingTitle(t)
            | ValidationError::MissingDescription(t) => Screen::Detail(*t),
        }
    }

    /// The field to focus once back on that screen
    pub fn field(&self) -> Field {
        match self {
            ValidationError::MissingServiceType => Field::ServiceType,
            ValidationError::MissingOption(_) => Field::Option,
            ValidationError::MissingTitle(_) => Field::Title,
            ValidationError::MissingDescription(_) => Field::Description,
        }
    }
}

/// Why a submission did not produce a listing
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("A submission is already in progress")]
    InFlight,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Normalize free-text price input.
///
/// Keeps digits, `,` and `.`, turns `,` into `.`, and parses the rest.
/// Anything unparseable is `0.0`, including input with more than one
/// separator such as `"1.200,50"`: thousands grouping is not recognized.
pub fn normalize_price(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// A file part of the listing payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPart {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart request body for creating a listing
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPayload {
    /// Text fields in submission order
    pub fields: Vec<(&'static str, String)>,
    /// One part per filled photo slot, in slot order
    pub photos: Vec<PhotoPart>,
}

impl ListingPayload {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn into_form(self) -> Result<Form, reqwest::Error> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for photo in self.photos {
            let part = Part::bytes(photo.bytes)
                .file_name(photo.file_name)
                .mime_str(&photo.media_type)?;
            form = form.part(FIELD_PHOTOS, part);
        }
        Ok(form)
    }
}

/// Check the draft preconditions, first failure wins
pub fn validate(draft: &ListingDraft) -> Result<(ServiceType, String), ValidationError> {
    let service_type = draft
        .service_type
        .ok_or(ValidationError::MissingServiceType)?;

    // A type switch keeps the old option around; it only counts if offered
    let option = draft
        .selected_option
        .as_deref()
        .map(str::trim)
        .and_then(|o| service_type.option(o))
        .ok_or(ValidationError::MissingOption(service_type))?;

    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle(service_type));
    }
    if draft.description.trim().is_empty() {
        return Err(ValidationError::MissingDescription(service_type));
    }

    Ok((service_type, option.id.to_string()))
}

/// Validate `draft` and build the payload the backend expects
pub fn assemble(draft: &ListingDraft) -> Result<ListingPayload, ValidationError> {
    let (service_type, option) = validate(draft)?;

    let fields = vec![
        (FIELD_SERVICE_TYPE, service_type.label().to_string()),
        (FIELD_OPTION, option),
        (FIELD_PRICE, normalize_price(&draft.price).to_string()),
        (FIELD_TITLE, draft.title.trim().to_string()),
        (FIELD_DESCRIPTION, draft.description.trim().to_string()),
    ];

    let photos = draft
        .photos
        .files()
        .map(|file| PhotoPart {
            file_name: file.name.clone(),
            media_type: file.media_type.clone(),
            bytes: file.bytes.clone(),
        })
        .collect();

    Ok(ListingPayload { fields, photos })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::PhotoFile;

    fn complete_draft() -> ListingDraft {
        let mut draft = ListingDraft::default();
        draft.service_type = Some(ServiceType::PinturaParedes);
        draft.selected_option = Some("interna".to_string());
        draft.price = "30,00".to_string();
        draft.title = "  Pintura Rápida ".to_string();
        draft.description = "Serviço completo\n".to_string();
        draft
    }

    #[test]
    fn test_normalize_price_examples() {
        assert_eq!(normalize_price("30,00"), 30.0);
        assert_eq!(normalize_price("R$50.00"), 50.0);
        assert_eq!(normalize_price(" R$ 1 200 "), 1200.0);
        assert_eq!(normalize_price(""), 0.0);
        assert_eq!(normalize_price("abc"), 0.0);
    }

    #[test]
    fn test_normalize_price_ambiguous_separators_fall_back_to_zero() {
        assert_eq!(normalize_price("1.234,56"), 0.0);
        assert_eq!(normalize_price("..."), 0.0);
    }

    #[test]
    fn test_missing_service_type_fails_first() {
        let mut draft = ListingDraft::default();
        assert_eq!(validate(&draft), Err(ValidationError::MissingServiceType));

        // Still the first failure when everything else is filled in
        draft = complete_draft();
        draft.service_type = None;
        assert_eq!(validate(&draft), Err(ValidationError::MissingServiceType));
    }

    #[test]
    fn test_validation_order() {
        let mut draft = complete_draft();
        draft.selected_option = None;
        draft.title.clear();
        draft.description.clear();
        assert_eq!(
            validate(&draft),
            Err(ValidationError::MissingOption(ServiceType::PinturaParedes))
        );

        draft.selected_option = Some("externa".to_string());
        assert_eq!(
            validate(&draft),
            Err(ValidationError::MissingTitle(ServiceType::PinturaParedes))
        );

        draft.title = "Fachada".to_string();
        draft.description = "   ".to_string();
        assert_eq!(
            validate(&draft),
            Err(ValidationError::MissingDescription(ServiceType::PinturaParedes))
        );
    }

    #[test]
    fn test_option_from_another_type_is_missing() {
        let mut draft = complete_draft();
        draft.service_type = Some(ServiceType::Assentamento);
        assert_eq!(
            validate(&draft),
            Err(ValidationError::MissingOption(ServiceType::Assentamento))
        );

        draft.selected_option = Some(" porcelanato ".to_string());
        let (_, option) = validate(&draft).unwrap();
        assert_eq!(option, "porcelanato");
    }

    #[test]
    fn test_normalize_price_rejects_repeated_separators() {
        assert_eq!(normalize_price("1.200,50"), 0.0);
        assert_eq!(normalize_price("12,5,0"), 0.0);
        assert_eq!(normalize_price("12,5"), 12.5);
    }

    #[test]
    fn test_validation_error_screens() {
        assert_eq!(
            ValidationError::MissingServiceType.screen(),
            Screen::SelectType
        );
        assert_eq!(
            ValidationError::MissingTitle(ServiceType::Acabamentos).screen(),
            Screen::Detail(ServiceType::Acabamentos)
        );
        assert_eq!(
            ValidationError::MissingDescription(ServiceType::Acabamentos).field(),
            Field::Description
        );
    }

    #[test]
    fn test_assemble_maps_and_trims_fields() {
        let payload = assemble(&complete_draft()).unwrap();

        assert_eq!(payload.fields.len(), 5);
        assert_eq!(payload.text(FIELD_SERVICE_TYPE), Some("Pintura de Paredes"));
        assert_eq!(payload.text(FIELD_OPTION), Some("interna"));
        assert_eq!(payload.text(FIELD_PRICE), Some("30"));
        assert_eq!(payload.text(FIELD_TITLE), Some("Pintura Rápida"));
        assert_eq!(payload.text(FIELD_DESCRIPTION), Some("Serviço completo"));
        assert!(payload.photos.is_empty());
    }

    #[test]
    fn test_assemble_skips_empty_slots_in_order() {
        let mut draft = complete_draft();
        draft
            .photos
            .assign(6, PhotoFile::new("depois.jpg", b"\xff\xd8\xffB".to_vec()))
            .unwrap();
        draft
            .photos
            .assign(1, PhotoFile::new("antes.jpg", b"\xff\xd8\xffA".to_vec()))
            .unwrap();

        let payload = assemble(&draft).unwrap();
        let names: Vec<&str> = payload.photos.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(names, vec!["antes.jpg", "depois.jpg"]);
        assert_eq!(payload.photos[0].media_type, "image/jpeg");
    }

    #[test]
    fn test_fractional_price_is_kept() {
        let mut draft = complete_draft();
        draft.price = "R$ 99,90".to_string();
        let payload = assemble(&draft).unwrap();
        assert_eq!(payload.text(FIELD_PRICE), Some("99.9"));
    }

    #[test]
    fn test_into_form_builds() {
        let mut draft = complete_draft();
        draft
            .photos
            .assign(0, PhotoFile::new("a.png", b"\x89PNG\r\n\x1a\n".to_vec()))
            .unwrap();
        assert!(assemble(&draft).unwrap().into_form().is_ok());
    }
}
