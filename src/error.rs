//! Crate-level error taxonomy.
//!
//! `Validation` is resolved before any network call. `Launch` aborts the flow
//! before a channel is opened. `Channel` and `Backend` both terminate a
//! session through the single error callback — callers distinguish them only
//! by message. Malformed inbound frames are not an error variant at all: the
//! session reader logs and ignores them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToxiError {
    /// Bad user input, caught before any network call is made.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The launch call was rejected or returned a malformed response.
    #[error("launch failed: {0}")]
    Launch(String),

    /// Transport-level failure on the progress channel.
    #[error("channel error: {0}")]
    Channel(String),

    /// A well-formed completion event with `success=false`.
    #[error("backend failure: {0}")]
    Backend(String),

    /// HTTP transport failure on a REST call.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// A REST response body that could not be parsed as the expected shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
