//! Summary statistics for predictor value sequences.
//!
//! Recomputed on demand during ingestion and written back onto the
//! persisted predictor record. Empty sequences never error; every field
//! degrades to `None`.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::error::Result;
use crate::domain::predictor::{Predictor, PredictorValue};
use crate::store::PredictorStore;

/// Derived summary fields. All `None` when the value sequence is empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PredictorStats {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub num_na: Option<usize>,
}

/// Summarize a value sequence.
///
/// `max` and `min` range over the numeric members. `num_na` counts the
/// values equal to the `"n/a"` marker, matching what the platform has
/// always persisted for this field. `mean` averages the whole sequence
/// with markers folded in as NaN; markers are not excluded, so a
/// contaminated sequence yields NaN.
pub fn summarize(values: &[PredictorValue]) -> PredictorStats {
    if values.is_empty() {
        return PredictorStats::default();
    }

    let numeric: Vec<f64> = values.iter().filter_map(PredictorValue::as_f64).collect();
    let num_na = values.iter().filter(|v| v.is_na()).count();

    if num_na > 0 && !numeric.is_empty() {
        warn!(num_na = num_na, "value sequence mixes numbers and n/a markers");
    }

    let sum: f64 = values.iter().map(|v| v.as_f64().unwrap_or(f64::NAN)).sum();

    PredictorStats {
        max: numeric.iter().copied().reduce(f64::max),
        min: numeric.iter().copied().reduce(f64::min),
        mean: Some(sum / values.len() as f64),
        num_na: Some(num_na),
    }
}

/// Recompute a predictor's derived fields from its value sequence and
/// write them back. Idempotent: the value sequence itself is never
/// modified.
pub fn compute_stats(predictor: &mut Predictor) -> PredictorStats {
    let stats = summarize(&predictor.float_values);
    predictor.max = stats.max;
    predictor.min = stats.min;
    predictor.mean = stats.mean;
    predictor.num_na = stats.num_na;
    stats
}

/// Recompute, stage the updated record on the store, and optionally
/// commit immediately. With `commit` false the caller's transaction
/// finalizes the write.
pub fn compute_and_store(
    store: &dyn PredictorStore,
    predictor: &mut Predictor,
    commit: bool,
) -> Result<PredictorStats> {
    let stats = compute_stats(predictor);
    store.add(predictor)?;
    if commit {
        store.commit()?;
    }
    Ok(stats)
}
