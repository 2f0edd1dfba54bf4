//! Error types for the enrichment pipeline.
//!
//! None of these reach the host. They are logged at the boundary where they
//! occur and the host's own behavior continues.

use thiserror::Error;

/// Failure of a single enricher.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The enricher gave up on this item.
    #[error("enricher '{enricher}' failed: {message}")]
    Failed { enricher: String, message: String },

    /// The enricher panicked; the item was restored.
    #[error("enricher '{enricher}' panicked: {message}")]
    Panicked { enricher: String, message: String },

    /// A value could not be converted to JSON.
    #[error("JSON conversion failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl EnrichError {
    pub fn failed(enricher: &str, message: impl Into<String>) -> Self {
        EnrichError::Failed {
            enricher: enricher.to_string(),
            message: message.into(),
        }
    }
}

/// Failure to patch or unpatch a host extension point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    /// The host does not expose this extension point.
    #[error("extension point '{name}' is not available")]
    Missing { name: String },

    /// The extension point already carries a wrapper.
    #[error("extension point '{name}' is already patched")]
    AlreadyPatched { name: String },

    /// There is no wrapper to remove.
    #[error("extension point '{name}' is not patched")]
    NotPatched { name: String },
}
