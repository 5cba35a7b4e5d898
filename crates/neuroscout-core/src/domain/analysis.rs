//! Analysis specification and predictor-event records.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Immutable description of an experiment design.
///
/// Fetched by the surrounding platform and passed through this pipeline
/// read-only; nothing in the build path mutates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisSpec {
    /// Content-derived public identity of the analysis.
    pub hash_id: String,

    /// Task the analysis models.
    pub task_name: String,

    /// Runs available to the analysis, in dataset order.
    pub runs: Vec<RunSpec>,

    /// Predictors the analysis selects, in selection order.
    pub predictors: Vec<PredictorRef>,

    /// Model description, passed through untouched to the modeling backend.
    #[serde(default)]
    pub model: serde_json::Value,
}

/// One scanning run of the source dataset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunSpec {
    pub id: i64,

    /// Scan length in seconds.
    pub duration: f64,

    /// Run number within the session, when the dataset records one.
    #[serde(default)]
    pub number: Option<i64>,

    #[serde(default)]
    pub session: Option<String>,

    #[serde(default)]
    pub subject: Option<String>,

    #[serde(default)]
    pub acquisition: Option<String>,
}

/// Predictor selected by an analysis.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictorRef {
    pub id: i64,
    pub name: String,
}

/// One row of the flat predictor-event table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictorEvent {
    pub predictor_id: i64,
    pub run_id: i64,

    /// Onset in seconds from run start.
    pub onset: f64,

    /// Duration in seconds.
    pub duration: f64,

    pub value: EventValue,
}

/// Event value: numeric amplitude or categorical label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum EventValue {
    Num(f64),
    Text(String),
}

impl EventValue {
    /// Total order used when duplicate (onset, duration) rows collide and
    /// the larger value wins: numbers sort below text, numbers by
    /// `total_cmp`, text lexicographically.
    pub fn total_order(&self, other: &EventValue) -> Ordering {
        match (self, other) {
            (EventValue::Num(a), EventValue::Num(b)) => a.total_cmp(b),
            (EventValue::Text(a), EventValue::Text(b)) => a.cmp(b),
            (EventValue::Num(_), EventValue::Text(_)) => Ordering::Less,
            (EventValue::Text(_), EventValue::Num(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for EventValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventValue::Num(v) => write!(f, "{}", v),
            EventValue::Text(s) => write!(f, "{}", s),
        }
    }
}
