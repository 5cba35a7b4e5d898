//! BIDS path construction for generated event files.

use crate::domain::entities::{EntityMap, EntityScalar, EntityValue};
use crate::domain::error::{NeuroscoutError, Result};

/// Build the BIDS events filename for one run's entities.
///
/// Pattern:
/// `sub-{subject}_[ses-{session}_]task-{task}_[acq-{acquisition}_][run-{run}_]events.tsv`
///
/// Bracketed segments drop out when the entity is absent. `subject` and
/// `task` are required; missing either fails with
/// [`NeuroscoutError::PathResolution`].
pub fn build_events_filename(entities: &EntityMap) -> Result<String> {
    let mut parts = vec![format!("sub-{}", require(entities, "subject")?)];
    if let Some(session) = scalar(entities, "session") {
        parts.push(format!("ses-{}", session));
    }
    parts.push(format!("task-{}", require(entities, "task")?));
    if let Some(acquisition) = scalar(entities, "acquisition") {
        parts.push(format!("acq-{}", acquisition));
    }
    if let Some(run) = scalar(entities, "run") {
        parts.push(format!("run-{}", run));
    }
    Ok(format!("{}_events.tsv", parts.join("_")))
}

/// A token only resolves from a scalar entity; merged multi-value
/// entities cannot fill a single filename slot.
fn scalar<'a>(entities: &'a EntityMap, token: &str) -> Option<&'a EntityScalar> {
    match entities.get(token) {
        Some(EntityValue::One(scalar)) => Some(scalar),
        _ => None,
    }
}

fn require<'a>(entities: &'a EntityMap, token: &str) -> Result<&'a EntityScalar> {
    scalar(entities, token).ok_or_else(|| NeuroscoutError::PathResolution {
        token: token.to_string(),
    })
}
