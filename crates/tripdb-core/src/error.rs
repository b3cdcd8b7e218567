// crates/tripdb-core/src/error.rs
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Sources
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{source_name}: header row is missing")]
    MissingHeader { source_name: String },

    #[error("failed to load catalog from {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    // Caller input
    #[error("invalid value {value:?} for filter `{field}`: {reason}")]
    InvalidFilter {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("invalid trip: {0}")]
    InvalidTrip(String),

    #[error("not found: {0}")]
    NotFound(String),

    // Storage
    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether the caller caused this error (bad filter value, unknown id).
    ///
    /// Client errors map to a 4xx response; everything else is a storage or
    /// source fault and maps to a 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFilter { .. } | Self::InvalidTrip(_) | Self::NotFound(_)
        )
    }

    pub(crate) fn invalid_filter(
        field: &'static str,
        value: impl Into<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidFilter {
            field,
            value: value.into(),
            reason,
        }
    }
}
