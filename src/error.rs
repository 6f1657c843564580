//! Custom error types for ledgerview
//!
//! Validation and not-found errors come from the ledger model and the
//! reconciliation layer. Transport errors come from the entry store and are
//! propagated without interpretation. Aggregation never produces an error.

use thiserror::Error;

/// The main error type for ledgerview operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Malformed entry or budget input, rejected before it reaches the ledger
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation on an id that was deleted or never existed
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Entry store failure with an opaque cause
    #[error("Transport error: {0}")]
    Transport(String),

    /// A snapshot fetch kept being superseded by newer fetches or writes
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file I/O errors (settings, export files)
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create a "not found" error for entries
    pub fn entry_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Entry",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for budgets
    pub fn budget_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Budget",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this came from the entry store
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for ledgerview operations
pub type LedgerResult<T> = Result<T, LedgerError>;
