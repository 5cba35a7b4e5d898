//! Structured observability hooks for the build lifecycle.
//!
//! This module provides:
//! - Analysis-scoped tracing spans via the `BuildSpan` RAII guard
//! - Emission functions for the key lifecycle events: start, events
//!   written, finish
//!
//! Events are emitted at `info!` level with stable `event = "..."` keys
//! so the surrounding workflow layer can observe build progress.

use tracing::info;

/// RAII guard that enters an analysis-scoped tracing span for the
/// duration of a build.
///
/// # Example
///
/// ```ignore
/// let _span = BuildSpan::enter("a3k9x");
/// // All tracing calls are now associated with analysis = "a3k9x"
/// ```
pub struct BuildSpan {
    _span: tracing::span::EnteredSpan,
}

impl BuildSpan {
    /// Create and enter a span tagged with the analysis hash id.
    pub fn enter(hash_id: &str) -> Self {
        let span = tracing::info_span!("neuroscout.build", analysis = %hash_id);
        Self {
            _span: span.entered(),
        }
    }
}

/// Emit event: build started.
pub fn emit_build_started(hash_id: &str, runs: usize, predictors: usize) {
    info!(
        event = "build.started",
        analysis = %hash_id,
        runs = runs,
        predictors = predictors,
    );
}

/// Emit event: event files materialized into staging.
pub fn emit_events_written(hash_id: &str, files: usize) {
    info!(event = "build.events_written", analysis = %hash_id, files = files);
}

/// Emit event: build finished, with whether a design was produced.
pub fn emit_build_finished(hash_id: &str, design: bool) {
    info!(event = "build.finished", analysis = %hash_id, design = design);
}
