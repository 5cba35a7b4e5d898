//! Analysis build orchestration.
//!
//! Ties the pipeline together: computes the merged entity scope for the
//! selected runs, materializes event files into a fresh staging
//! directory, and optionally hands the result to a modeling backend.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempDir;

use crate::domain::analysis::{AnalysisSpec, PredictorEvent};
use crate::domain::entities::{
    extract_entities, merge_entities, EntityMap, EntityScalar, EntityValue,
};
use crate::domain::error::{NeuroscoutError, Result};
use crate::events::{write_events, EventFilePath};
use crate::obs;

/// Design specification produced by the modeling backend, consumed by
/// downstream model fitting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DesignSpec {
    pub bids_root: PathBuf,
    pub derivatives: PathBuf,
    pub model: serde_json::Value,
    pub scope: EntityMap,
}

/// Modeling backend seam.
///
/// Implementations load the BIDS dataset at `bids_root` with the staged
/// event files overlaid as derivatives and apply the model description
/// against the entity scope. Staging output is synthetic, so backends
/// must not validate it against full dataset conventions.
pub trait ModelBackend {
    fn setup(
        &self,
        bids_root: &Path,
        derivatives: &Path,
        model: serde_json::Value,
        scope: &EntityMap,
    ) -> Result<DesignSpec>;
}

/// Bundled backend: checks the dataset root exists and records the
/// inputs as a [`DesignSpec`].
#[derive(Debug, Clone, Default)]
pub struct LayoutBackend;

impl ModelBackend for LayoutBackend {
    fn setup(
        &self,
        bids_root: &Path,
        derivatives: &Path,
        model: serde_json::Value,
        scope: &EntityMap,
    ) -> Result<DesignSpec> {
        if !bids_root.is_dir() {
            return Err(NeuroscoutError::DatasetNotFound {
                path: bids_root.to_path_buf(),
            });
        }
        Ok(DesignSpec {
            bids_root: bids_root.to_path_buf(),
            derivatives: derivatives.to_path_buf(),
            model,
            scope: scope.clone(),
        })
    }
}

/// Everything one build produces. The staging directory is removed when
/// this value drops; callers keep it alive while archiving the files.
#[derive(Debug)]
pub struct BuiltAnalysis {
    pub staging: TempDir,
    pub paths: Vec<EventFilePath>,
    pub design: Option<DesignSpec>,
}

/// Build an analysis.
///
/// Allocates a fresh staging directory, computes the merged entity
/// scope over the runs named by `run_ids` (plus the synthetic
/// `scan_length` and `task` entities), writes the event files, and runs
/// the backend's model setup when one is given. Without a backend the
/// event files are materialized and `design` is `None`.
pub fn build_analysis(
    analysis: &AnalysisSpec,
    events: &[PredictorEvent],
    bids_root: &Path,
    run_ids: Option<&[i64]>,
    backend: Option<&dyn ModelBackend>,
) -> Result<BuiltAnalysis> {
    let staging = TempDir::new()?;
    obs::emit_build_started(&analysis.hash_id, analysis.runs.len(), analysis.predictors.len());

    let scope = build_scope(analysis, run_ids);

    let paths = write_events(analysis, events, staging.path(), run_ids)?;
    obs::emit_events_written(&analysis.hash_id, paths.len());

    let design = match backend {
        Some(backend) => {
            // The model is cloned per build so repeated builds never
            // share mutable model state.
            Some(backend.setup(bids_root, staging.path(), analysis.model.clone(), &scope)?)
        }
        None => None,
    };
    obs::emit_build_finished(&analysis.hash_id, design.is_some());

    Ok(BuiltAnalysis {
        staging,
        paths,
        design,
    })
}

/// Merged entity scope for a run selection.
///
/// `run_ids` order decides first-seen merge order; ids the analysis does
/// not know are skipped. `scan_length` is the maximum duration across
/// all of the analysis's runs, not just the selection, and is omitted
/// only when the analysis has no runs at all.
fn build_scope(analysis: &AnalysisSpec, run_ids: Option<&[i64]>) -> EntityMap {
    let mut per_run = Vec::new();
    if let Some(ids) = run_ids {
        for id in ids {
            if let Some(run) = analysis.runs.iter().find(|run| run.id == *id) {
                per_run.push(extract_entities(run));
            }
        }
    }

    let mut scope = merge_entities(&per_run);
    if let Some(scan_length) = analysis.runs.iter().map(|run| run.duration).reduce(f64::max) {
        scope.insert(
            "scan_length".to_string(),
            EntityValue::One(EntityScalar::Float(scan_length)),
        );
    }
    scope.insert(
        "task".to_string(),
        EntityValue::One(EntityScalar::Text(analysis.task_name.clone())),
    );
    scope
}
