//! Event file emission.
//!
//! Converts the flat predictor-event table into one BIDS event file per
//! (run, predictor) under `func/<predictor>/`, plus the
//! dataset-description manifest. Returns the path list the archiving
//! collaborator uploads.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bids::build_events_filename;
use crate::domain::analysis::{AnalysisSpec, EventValue, PredictorEvent};
use crate::domain::entities::{extract_entities, EntityScalar, EntityValue as Entity};
use crate::domain::error::Result;
use crate::domain::predictor::NA_VALUE;

/// BIDS specification version stamped into generated datasets.
pub const BIDS_VERSION: &str = "1.1.1";

/// Pipeline name stamped into generated datasets.
pub const PIPELINE_NAME: &str = "Neuroscout Events";

/// `dataset_description.json` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct DatasetDescription {
    pub name: String,
    #[serde(rename = "BIDSVersion")]
    pub bids_version: String,
    pub pipeline_description: PipelineDescription,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct PipelineDescription {
    pub name: String,
}

impl DatasetDescription {
    fn for_analysis(analysis: &AnalysisSpec) -> Self {
        Self {
            name: analysis.hash_id.clone(),
            bids_version: BIDS_VERSION.to_string(),
            pipeline_description: PipelineDescription {
                name: PIPELINE_NAME.to_string(),
            },
        }
    }
}

/// A produced artifact: where it landed and where it belongs in the
/// uploaded archive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventFilePath {
    pub absolute: PathBuf,
    pub archive: String,
}

/// One output row of an event file.
#[derive(Debug, Clone, PartialEq)]
struct EventRow {
    onset: f64,
    duration: f64,
    value: EventValue,
}

impl EventRow {
    fn placeholder() -> Vec<EventRow> {
        vec![EventRow {
            onset: 0.0,
            duration: 0.0,
            value: EventValue::Text(NA_VALUE.to_string()),
        }]
    }
}

/// Write BIDS event files for an analysis.
///
/// Runs are taken in analysis order, filtered to `run_ids` when given;
/// unknown ids are silently excluded. Every predictor the analysis names
/// yields one file per run: real rows where events exist, a single
/// `(0, 0, "n/a")` placeholder row where none do. Duplicate
/// (onset, duration) rows within a predictor collapse to the maximum
/// value.
pub fn write_events(
    analysis: &AnalysisSpec,
    events: &[PredictorEvent],
    outdir: &Path,
    run_ids: Option<&[i64]>,
) -> Result<Vec<EventFilePath>> {
    let runs: Vec<_> = match run_ids {
        Some(ids) => analysis
            .runs
            .iter()
            .filter(|run| ids.contains(&run.id))
            .collect(),
        None => analysis.runs.iter().collect(),
    };

    let description = DatasetDescription::for_analysis(analysis);
    let description_path = outdir.join("dataset_description.json");
    fs::write(&description_path, serde_json::to_string(&description)?)?;
    let mut paths = vec![EventFilePath {
        absolute: description_path,
        archive: "dataset_description.json".to_string(),
    }];

    let func_dir = outdir.join("func");
    fs::create_dir_all(&func_dir)?;

    let predictor_names: BTreeMap<i64, &str> = analysis
        .predictors
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();
    let known_names: BTreeSet<&str> = predictor_names.values().copied().collect();

    for run in runs {
        let mut entities = extract_entities(run);
        entities.insert(
            "task".to_string(),
            Entity::One(EntityScalar::Text(analysis.task_name.clone())),
        );
        let filename = build_events_filename(&entities)?;

        // Group this run's events by predictor name. Events whose
        // predictor id the analysis does not name are dropped.
        let mut columns: BTreeMap<&str, Vec<EventRow>> = BTreeMap::new();
        for event in events.iter().filter(|e| e.run_id == run.id) {
            if let Some(name) = predictor_names.get(&event.predictor_id).copied() {
                columns.entry(name).or_default().push(EventRow {
                    onset: event.onset,
                    duration: event.duration,
                    value: event.value.clone(),
                });
            }
        }
        for rows in columns.values_mut() {
            *rows = collapse_rows(std::mem::take(rows));
        }

        // Predictors absent from this run get a single n/a row.
        for name in known_names.iter().copied() {
            columns.entry(name).or_insert_with(EventRow::placeholder);
        }

        for (name, rows) in &columns {
            let dir = func_dir.join(name);
            fs::create_dir_all(&dir)?;
            let path = dir.join(&filename);
            fs::write(&path, render_tsv(name, rows))?;
            paths.push(EventFilePath {
                absolute: path,
                archive: format!("events/{}/{}", name, filename),
            });
        }

        debug!(run_id = run.id, files = columns.len(), "wrote run event files");
    }

    Ok(paths)
}

/// Sort rows by (onset, duration) and collapse duplicate keys, keeping
/// the maximum value.
fn collapse_rows(mut rows: Vec<EventRow>) -> Vec<EventRow> {
    rows.sort_by(|a, b| {
        a.onset
            .total_cmp(&b.onset)
            .then_with(|| a.duration.total_cmp(&b.duration))
    });

    let mut collapsed: Vec<EventRow> = Vec::with_capacity(rows.len());
    for row in rows {
        match collapsed.last_mut() {
            Some(last) if last.onset == row.onset && last.duration == row.duration => {
                if last.value.total_order(&row.value) == Ordering::Less {
                    last.value = row.value;
                }
            }
            _ => collapsed.push(row),
        }
    }
    collapsed
}

fn render_tsv(name: &str, rows: &[EventRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("onset\tduration\t{}\n", name));
    for row in rows {
        out.push_str(&format!("{}\t{}\t{}\n", row.onset, row.duration, row.value));
    }
    out
}
