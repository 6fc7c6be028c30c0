//! Marketplace backend client
//!
//! This module provides:
//! - The `ListingApi` trait the wizard submits through
//! - `HttpListingApi`, the reqwest implementation
//! - `MockListingApi`, a scripted implementation for tests
//! - Response decoding shared by both

pub mod error;
pub mod http;
pub mod mock;

pub use error::ApiError;
pub use http::HttpListingApi;
pub use mock::MockListingApi;

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::draft::ServiceType;
use crate::submission::ListingPayload;

/// Identifier returned by the backend for a newly created listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedListing {
    pub id: String,
}

/// Thumbnail URL per service type
pub type Thumbnails = HashMap<ServiceType, String>;

/// Trait abstracting the marketplace backend for testability
#[async_trait]
pub trait ListingApi: Send + Sync {
    /// Thumbnail image URL for each service type
    async fn fetch_thumbnails(&self) -> Result<Thumbnails, ApiError>;

    /// Create a listing from a multipart payload
    async fn create_listing(&self, payload: ListingPayload) -> Result<CreatedListing, ApiError>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

fn error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}

fn listing_id(value: &Value) -> Option<String> {
    let id = value.get("id").or_else(|| value.get("anuncioId"))?;
    match id {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Decode the response to a create-listing request
pub fn parse_create_response(
    endpoint: &str,
    status: u16,
    body: &str,
) -> Result<CreatedListing, ApiError> {
    match status {
        401 => return Err(ApiError::unauthorized(endpoint)),
        403 => return Err(ApiError::forbidden(endpoint)),
        _ => {}
    }

    if !(200..300).contains(&status) {
        let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ApiError::rejected(status, message));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::invalid_response(endpoint, format!("Parse error: {}", e)))?;

    if let Some(id) = listing_id(&value) {
        return Ok(CreatedListing { id });
    }

    // Some handlers answer 200 with an error payload
    match error_message(body) {
        Some(message) => Err(ApiError::rejected(status, message)),
        None => Err(ApiError::invalid_response(
            endpoint,
            "No listing id in response",
        )),
    }
}

/// Decode the thumbnail map, ignoring unknown service types
pub fn parse_thumbnails(endpoint: &str, status: u16, body: &str) -> Result<Thumbnails, ApiError> {
    if !(200..300).contains(&status) {
        let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ApiError::rejected(status, message));
    }

    let raw: HashMap<String, Value> = serde_json::from_str(body)
        .map_err(|e| ApiError::invalid_response(endpoint, format!("Parse error: {}", e)))?;

    let mut thumbnails = Thumbnails::new();
    for (key, value) in raw {
        match (ServiceType::from_id(&key), value) {
            (Some(service_type), Value::String(url)) if !url.is_empty() => {
                thumbnails.insert(service_type, url);
            }
            _ => debug!(key = %key, "Ignoring thumbnail entry"),
        }
    }
    Ok(thumbnails)
}
