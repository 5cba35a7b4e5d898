//! Neuroscout Core Library
//!
//! The analysis-build pipeline: given a declarative analysis
//! specification and a flat table of predictor events, derive per-run
//! BIDS event files, merge run entities across the selected run subset,
//! and assemble a design specification for downstream modeling.

pub mod bids;
pub mod builder;
pub mod confounds;
pub mod domain;
pub mod events;
pub mod hashing;
pub mod obs;
pub mod stats;
pub mod store;
pub mod telemetry;

pub use domain::{
    extract_entities, merge_entities, AnalysisSpec, EntityMap, EntityScalar, EntityValue,
    EventValue, NeuroscoutError, Predictor, PredictorEvent, PredictorRef, PredictorValue, Result,
    RunSpec, NA_VALUE,
};

pub use bids::build_events_filename;
pub use builder::{build_analysis, BuiltAnalysis, DesignSpec, LayoutBackend, ModelBackend};
pub use confounds::{impute_confounds, ConfoundColumn, ConfoundTable};
pub use events::{
    write_events, DatasetDescription, EventFilePath, PipelineDescription, BIDS_VERSION,
    PIPELINE_NAME,
};
pub use hashing::{hash_bytes, hash_stimulus, hash_text, LoadedStimulus, Stimulus, StimulusData};
pub use stats::{compute_and_store, compute_stats, summarize, PredictorStats};
pub use store::{MemoryPredictorStore, PredictorStore};

pub use obs::{emit_build_finished, emit_build_started, emit_events_written, BuildSpan};
pub use telemetry::init_tracing;

/// Neuroscout version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
