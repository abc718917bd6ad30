//! Error types for the Notion client and the settings store.
//!
//! # Design
//! Every non-2xx response lands in `ApiError::Http` with the raw status code
//! and body text, which is what the user sees in the "add failed" alert. The
//! remaining variants cover failures that happen before or after the server
//! answers: no response at all, or JSON that could not be produced/consumed.

use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by `NotionClient` parse methods and controller round trips.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a non-2xx status.
    #[error("Notion API Error: {status} - {body}")]
    Http { status: u16, body: String },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// No credential or data source id has been saved yet.
    #[error("API key or data source id is not configured")]
    NotConfigured,
}

/// Errors raised while reading or writing persisted settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings storage is corrupt: {0}")]
    Decode(String),

    #[error("settings could not be encoded: {0}")]
    Encode(String),
}
