//! Dragon Ball API client library
//!
//! This crate provides a typed client for the public Dragon Ball REST API
//! (<https://dragonball-api.com>), including the wire models and the
//! data-source traits the repositories consume.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod datasource;
pub mod models;

pub use client::{ApiClient, ApiClientConfig};
pub use datasource::{
    CharacterDataSource, DragonBallApi, PlanetDataSource, TransformationDataSource,
};
pub use models::{
    Character, OriginPlanet, Page, PageLinks, PageMeta, Planet, Transformation,
    TransformationDetail,
};

/// Result type for API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Error types for API operations
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API error with status code and message
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from server
        message: String,
    },
}

impl ApiError {
    /// Get the HTTP status code, if the error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::Json(_) => None,
        }
    }

    /// Check if this error is a 404 from the server
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this is a network-class error
    ///
    /// Transport failures (connect, timeout) count, as do the transient HTTP
    /// statuses: 408, 425, 429, 500, 502, 503, 504, 522, 524.
    pub fn is_network_error(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Api { status, .. } => {
                matches!(status, 408 | 425 | 429 | 500 | 502 | 503 | 504 | 522 | 524)
            }
            ApiError::Json(_) => false,
        }
    }
}
