//! Marketplace API error types

use std::fmt;

/// Errors that can occur when talking to the marketplace backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 401 Unauthorized - token missing, invalid or expired
    Unauthorized { endpoint: String },
    /// 403 Forbidden - the account may not publish listings
    Forbidden { endpoint: String },
    /// The server answered with an error payload
    Rejected { status: u16, message: String },
    /// Network or timeout error
    NetworkError { endpoint: String, message: String },
    /// The server answered with something we could not decode
    InvalidResponse { endpoint: String, message: String },
    /// The request body could not be built
    InvalidPayload { message: String },
}

impl ApiError {
    /// Check if this is an authentication error (401 or 403)
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            ApiError::Unauthorized { .. } | ApiError::Forbidden { .. }
        )
    }

    /// Whether sending the same request again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError { .. } => true,
            ApiError::Rejected { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub fn unauthorized(endpoint: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            endpoint: endpoint.into(),
        }
    }

    pub fn forbidden(endpoint: impl Into<String>) -> Self {
        ApiError::Forbidden {
            endpoint: endpoint.into(),
        }
    }

    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn network(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NetworkError {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn invalid_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InvalidResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        ApiError::InvalidPayload {
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized { endpoint } => {
                write!(f, "{}: Unauthorized (401) - sign in again", endpoint)
            }
            ApiError::Forbidden { endpoint } => {
                write!(
                    f,
                    "{}: Forbidden (403) - this account cannot publish listings",
                    endpoint
                )
            }
            ApiError::Rejected { status, message } => {
                write!(f, "Server rejected the listing ({}): {}", status, message)
            }
            ApiError::NetworkError { endpoint, message } => {
                write!(f, "{}: Network error - {}", endpoint, message)
            }
            ApiError::InvalidResponse { endpoint, message } => {
                write!(f, "{}: Unexpected response - {}", endpoint, message)
            }
            ApiError::InvalidPayload { message } => {
                write!(f, "Could not build listing request: {}", message)
            }
        }
    }
}

impl std::error::Error for ApiError {}
