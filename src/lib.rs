//! Group per-image result JSONs by their `file_path` and write one
//! `<stem>-consolidated.json` per source image next to the inputs.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};

pub mod discover;
pub mod error;
pub mod extract;
pub mod group;
pub mod logging;
pub mod report;
pub mod write;

pub use error::ConsolidateError;
pub use extract::ReducedRecord;
pub use group::Groups;
pub use report::{FileOutcome, GroupOutcome, RunSummary, SkipReason};

/// What a single run should do.
#[derive(Debug, Clone)]
pub struct Options {
    /// Directory holding the result JSONs; outputs are written here too
    pub dir: PathBuf,
    pub dry_run: bool,
    /// Draw a progress bar while reading inputs
    pub progress: bool,
}

impl Options {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dry_run: false,
            progress: false,
        }
    }
}

/// Discover, group, write. Only a missing/unreadable directory is an error;
/// everything else ends up in the summary.
pub fn run(options: &Options) -> Result<RunSummary, ConsolidateError> {
    let mut summary = RunSummary::new(options.dry_run);

    let inputs = discover::discover_inputs(&options.dir)?;
    summary.inputs_found = inputs.len();
    if inputs.is_empty() {
        warn!("No JSON files found in {}", options.dir.display());
        return Ok(summary);
    }
    info!("Found {} JSON files to process", inputs.len());

    // ----- grouping -----------------------------------------------------------
    let bar = progress_bar(inputs.len(), options.progress);
    let mut groups = Groups::new();
    for path in inputs {
        let outcome = read_into(&path, &mut groups);
        bar.suspend(|| log_file_outcome(&path, &outcome));
        summary.files.push(report::FileReport { path, outcome });
        bar.inc(1);
    }
    bar.finish_and_clear();

    summary.groups = groups.len();
    info!(
        "Grouped {} records into {} unique file paths",
        groups.total_records(),
        groups.len()
    );

    // ----- output -------------------------------------------------------------
    let mut writer = write::OutputWriter::new(&options.dir, options.dry_run);
    for (file_path, records) in groups.iter() {
        let report = writer.write_group(file_path, records);
        log_group_outcome(&report, options.dry_run);
        summary.outputs.push(report);
    }

    if options.dry_run {
        info!("Dry run complete: {} files would be created", summary.created());
    } else {
        info!("Consolidation complete: {} files created", summary.created());
    }
    Ok(summary)
}

fn read_into(path: &Path, groups: &mut Groups) -> FileOutcome {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) => return FileOutcome::Failed(e.to_string()),
    };
    match extract::extract_record(&raw) {
        Ok((file_path, record)) => {
            groups.push(file_path.clone(), record);
            FileOutcome::Grouped { file_path }
        }
        // a consolidated file is keyed by the path itself, never by "file_path"
        Err(SkipReason::MissingFilePath) if write::is_previous_output(path) => {
            FileOutcome::Skipped(SkipReason::PreviousOutput)
        }
        Err(reason) => FileOutcome::Skipped(reason),
    }
}

fn log_file_outcome(path: &Path, outcome: &FileOutcome) {
    let name = path.file_name().unwrap_or(path.as_os_str()).to_string_lossy();
    match outcome {
        FileOutcome::Grouped { file_path } => debug!("{name}: grouped under {file_path}"),
        FileOutcome::Skipped(SkipReason::PreviousOutput) => {
            info!("{name}: skipping output of a previous run")
        }
        FileOutcome::Skipped(reason) => warn!("Skipping {name}: {reason}"),
        FileOutcome::Failed(e) => warn!("Error reading {name}: {e}"),
    }
}

fn log_group_outcome(report: &report::GroupReport, dry_run: bool) {
    match &report.outcome {
        GroupOutcome::Written {
            file_name,
            records,
            overwrote,
        } => {
            if let Some(previous) = overwrote {
                warn!(
                    "{file_name}: '{}' and '{previous}' map to the same file, keeping '{}'",
                    report.file_path, report.file_path
                );
            }
            let verb = if dry_run { "Would create" } else { "Created" };
            info!("{verb} {file_name} with {records} records");
        }
        GroupOutcome::Failed(e) => {
            warn!("Error writing output for {}: {e}", report.file_path)
        }
    }
}

fn progress_bar(len: usize, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
    ) {
        bar.set_style(style);
    }
    bar
}
