//! Domain-level error taxonomy for the analysis-build pipeline.

use std::path::PathBuf;

/// Neuroscout pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum NeuroscoutError {
    #[error("stimulus file not found: {path:?}")]
    StimulusNotFound { path: PathBuf },

    #[error("cannot resolve event file path: missing required entity {token}")]
    PathResolution { token: String },

    #[error("bids dataset root not found: {path:?}")]
    DatasetNotFound { path: PathBuf },

    /// Failure surfaced by a [`PredictorStore`](crate::store::PredictorStore)
    /// implementation.
    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, NeuroscoutError>;
