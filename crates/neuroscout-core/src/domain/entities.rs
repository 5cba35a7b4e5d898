//! Run entities: extraction from run records and set-union merging.
//!
//! Entities are the identifying attributes of a scan run (subject,
//! session, run number, acquisition) that parameterize BIDS filenames
//! and scope the modeling setup.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::analysis::RunSpec;

/// A single entity value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EntityScalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for EntityScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityScalar::Int(v) => write!(f, "{}", v),
            EntityScalar::Float(v) => write!(f, "{}", v),
            EntityScalar::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Entity values are scalar for a single run and widen to a list when a
/// merge across runs observes more than one distinct value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EntityValue {
    One(EntityScalar),
    Many(Vec<EntityScalar>),
}

impl EntityValue {
    fn members(&self) -> &[EntityScalar] {
        match self {
            EntityValue::One(scalar) => std::slice::from_ref(scalar),
            EntityValue::Many(scalars) => scalars.as_slice(),
        }
    }
}

/// Entity name to value, ordered by name for deterministic output.
pub type EntityMap = BTreeMap<String, EntityValue>;

/// Extract the whitelisted BIDS entities from a run record.
///
/// Only non-null fields are emitted; the dataset's `number` field is
/// renamed to the BIDS `run` entity.
pub fn extract_entities(run: &RunSpec) -> EntityMap {
    let mut entities = EntityMap::new();
    if let Some(number) = run.number {
        entities.insert("run".to_string(), EntityValue::One(EntityScalar::Int(number)));
    }
    if let Some(session) = &run.session {
        entities.insert(
            "session".to_string(),
            EntityValue::One(EntityScalar::Text(session.clone())),
        );
    }
    if let Some(subject) = &run.subject {
        entities.insert(
            "subject".to_string(),
            EntityValue::One(EntityScalar::Text(subject.clone())),
        );
    }
    if let Some(acquisition) = &run.acquisition {
        entities.insert(
            "acquisition".to_string(),
            EntityValue::One(EntityScalar::Text(acquisition.clone())),
        );
    }
    entities
}

/// Set-union merge across an ordered sequence of entity maps.
///
/// Distinct values per key are collected with duplicates collapsed.
/// Singleton sets stay scalar; larger sets surface as a list in
/// first-seen order. Empty input yields an empty map.
pub fn merge_entities(maps: &[EntityMap]) -> EntityMap {
    let mut collected: BTreeMap<String, Vec<EntityScalar>> = BTreeMap::new();

    for map in maps {
        for (key, value) in map {
            let bucket = collected.entry(key.clone()).or_default();
            for scalar in value.members() {
                if !bucket.contains(scalar) {
                    bucket.push(scalar.clone());
                }
            }
        }
    }

    collected
        .into_iter()
        .map(|(key, mut values)| {
            let value = if values.len() == 1 {
                EntityValue::One(values.remove(0))
            } else {
                EntityValue::Many(values)
            };
            (key, value)
        })
        .collect()
}
