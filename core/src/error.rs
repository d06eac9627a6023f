//! Error types for the todo API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the todo does not exist" from "the server returned an unexpected status."
//! All other unexpected responses land in `HttpError` with the raw status code
//! and body for debugging.

/// Errors returned by `TodoClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404: the requested todo does not exist.
    #[error("todo not found")]
    NotFound,

    /// The server returned a status other than the expected one or 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(#[source] serde_json::Error),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),
}
