//! Domain models for the analysis-build pipeline.
//!
//! Canonical definitions for the core entities:
//! - `AnalysisSpec`: Immutable specification of an analysis
//! - `RunSpec` / `PredictorEvent`: the raw inputs a build consumes
//! - `EntityMap`: run metadata used for filenames and model scoping
//! - `Predictor`: persisted predictor record with derived statistics

pub mod analysis;
pub mod entities;
pub mod error;
pub mod predictor;

// Re-export main types and errors
pub use analysis::{AnalysisSpec, EventValue, PredictorEvent, PredictorRef, RunSpec};
pub use entities::{extract_entities, merge_entities, EntityMap, EntityScalar, EntityValue};
pub use error::{NeuroscoutError, Result};
pub use predictor::{Predictor, PredictorValue, NA_VALUE};
