//! Neuroscout - analysis-build pipeline CLI
//!
//! The `neuroscout` command materializes BIDS event files for an
//! analysis specification and fingerprints stimulus content.
//!
//! ## Commands
//!
//! - `compile`: Write BIDS event files and the compile report for an analysis
//! - `hash`: Print the SHA-1 content digest of a stimulus file

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;

use neuroscout_core::{
    hash_stimulus, write_events, AnalysisSpec, BuildSpan, EventFilePath, PredictorEvent, Stimulus,
};

#[derive(Parser)]
#[command(name = "neuroscout")]
#[command(author = "Neuroscout Developers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Neuroscout analysis-build pipeline", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write BIDS event files for an analysis specification
    Compile {
        /// Analysis specification (JSON)
        #[arg(short, long)]
        analysis: PathBuf,

        /// Predictor events (JSON array)
        #[arg(short, long)]
        events: PathBuf,

        /// Output directory for event files and the compile report
        #[arg(short, long)]
        out: PathBuf,

        /// Restrict to these run ids (comma-separated)
        #[arg(long)]
        runs: Option<String>,
    },

    /// Print the SHA-1 content digest of a stimulus file
    Hash {
        /// Path to the stimulus file
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    neuroscout_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Compile {
            analysis,
            events,
            out,
            runs,
        } => cmd_compile(&analysis, &events, &out, runs.as_deref()),
        Commands::Hash { path } => cmd_hash(&path),
    }
}

/// compile_report.json payload: the path manifest the archiving
/// collaborator consumes.
#[derive(Debug, Clone, Serialize)]
struct CompileReport {
    analysis: String,
    generated_at: DateTime<Utc>,
    file_count: usize,
    paths: Vec<EventFilePath>,
}

/// Write BIDS event files and the compile report for an analysis
fn cmd_compile(
    analysis_path: &Path,
    events_path: &Path,
    out: &Path,
    runs: Option<&str>,
) -> Result<()> {
    let analysis: AnalysisSpec = read_json_file(analysis_path)?;
    let events: Vec<PredictorEvent> = read_json_file(events_path)?;
    let run_ids = runs.map(parse_run_ids).transpose()?;

    std::fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {:?}", out))?;

    let _span = BuildSpan::enter(&analysis.hash_id);
    let paths = write_events(&analysis, &events, out, run_ids.as_deref())
        .with_context(|| format!("Failed to write event files for {}", analysis.hash_id))?;

    let report = CompileReport {
        analysis: analysis.hash_id.clone(),
        generated_at: Utc::now(),
        file_count: paths.len(),
        paths,
    };
    let report_path = out.join("compile_report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("Failed to write compile report to {:?}", report_path))?;

    println!(
        "Compiled {} event files for analysis {}",
        report.file_count, report.analysis
    );
    println!("Report: {:?}", report_path);

    Ok(())
}

/// Print the SHA-1 content digest of a stimulus file
fn cmd_hash(path: &Path) -> Result<()> {
    let digest = hash_stimulus(&Stimulus::File(path.to_path_buf()))
        .with_context(|| format!("Failed to hash stimulus: {:?}", path))?;

    println!("{}", digest);

    Ok(())
}

fn read_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn parse_run_ids(runs: &str) -> Result<Vec<i64>> {
    runs.split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid run id: {}", part))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
        let analysis = json!({
            "hash_id": "t3stz",
            "task_name": "stroop",
            "runs": [
                {"id": 1, "duration": 300.0, "number": 1, "subject": "01"},
                {"id": 2, "duration": 300.0, "number": 2, "subject": "01"}
            ],
            "predictors": [{"id": 1, "name": "RT"}],
            "model": {"Steps": []}
        });
        let events = json!([
            {"predictor_id": 1, "run_id": 1, "onset": 0.5, "duration": 2.0, "value": 1.0}
        ]);

        let analysis_path = dir.join("analysis.json");
        let events_path = dir.join("events.json");
        std::fs::write(&analysis_path, analysis.to_string()).unwrap();
        std::fs::write(&events_path, events.to_string()).unwrap();
        (analysis_path, events_path)
    }

    #[test]
    fn test_compile_writes_files_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let (analysis_path, events_path) = write_inputs(dir.path());
        let out = dir.path().join("out");

        cmd_compile(&analysis_path, &events_path, &out, None).unwrap();

        assert!(out.join("dataset_description.json").is_file());
        assert!(out
            .join("func")
            .join("RT")
            .join("sub-01_task-stroop_run-1_events.tsv")
            .is_file());

        let report: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(out.join("compile_report.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(report["analysis"], "t3stz");
        // description plus one file per run for the single predictor
        assert_eq!(report["file_count"], 3);
        assert_eq!(report["paths"].as_array().unwrap().len(), 3);
        assert_eq!(report["paths"][0]["archive"], "dataset_description.json");
    }

    #[test]
    fn test_compile_restricts_to_requested_runs() {
        let dir = tempfile::tempdir().unwrap();
        let (analysis_path, events_path) = write_inputs(dir.path());
        let out = dir.path().join("out");

        cmd_compile(&analysis_path, &events_path, &out, Some("2")).unwrap();

        assert!(out
            .join("func")
            .join("RT")
            .join("sub-01_task-stroop_run-2_events.tsv")
            .is_file());
        assert!(!out
            .join("func")
            .join("RT")
            .join("sub-01_task-stroop_run-1_events.tsv")
            .exists());
    }

    #[test]
    fn test_compile_rejects_bad_run_ids() {
        let dir = tempfile::tempdir().unwrap();
        let (analysis_path, events_path) = write_inputs(dir.path());
        let out = dir.path().join("out");

        let err = cmd_compile(&analysis_path, &events_path, &out, Some("1,x")).unwrap_err();
        assert!(format!("{:#}", err).contains("Invalid run id"));
    }

    #[test]
    fn test_parse_run_ids() {
        assert_eq!(parse_run_ids("1,2, 3").unwrap(), vec![1, 2, 3]);
        assert!(parse_run_ids("1,x").is_err());
    }

    #[test]
    fn test_hash_missing_file_fails() {
        let err = cmd_hash(Path::new("/no/such/stimulus.mp4")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to hash stimulus"));
    }

    #[test]
    fn test_hash_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stim.txt");
        std::fs::write(&path, "abc").unwrap();

        cmd_hash(&path).unwrap();
    }
}
