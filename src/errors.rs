//! Shared error types for the scoring engine.
//!
//! Plugins return `anyhow::Error` because their failures are opaque to the
//! engine; everything the engine itself can reject is categorized here.

use thiserror::Error;

use crate::core::Severity;

/// Main error type for specscore operations
#[derive(Debug, Error)]
pub enum Error {
    /// An analyzer is present in the result set but has no weight entry
    #[error("Scoring error: no score config for analyzer '{analyzer}'")]
    MissingScoreConfig { analyzer: String },

    /// A spec analysis reached scoring without a result
    #[error("Scoring error: analysis for '{analyzer}' has no result")]
    MissingResult { analyzer: String },

    /// A finding was added before its rule metadata was registered
    #[error("Finding for unregistered rule '{rule}' at severity {severity}")]
    UnregisteredRule { severity: Severity, rule: String },

    /// `set_result` validation failures
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Service-name template errors
    #[error("Template error: {0}")]
    Template(String),

    /// A plugin call failed
    #[error("Analyzer '{analyzer}' failed: {message}")]
    Plugin { analyzer: String, message: String },

    /// Lookup misses in the storage layer
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage layer failures
    #[error("Storage error: {0}")]
    Storage(String),

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a plugin failure for an analyzer
    pub fn plugin(analyzer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Plugin {
            analyzer: analyzer.into(),
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }

    /// Whether the error aborts a whole scoring call
    pub fn is_scoring_failure(&self) -> bool {
        matches!(
            self,
            Self::MissingScoreConfig { .. } | Self::MissingResult { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
