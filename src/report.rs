use std::path::PathBuf;

use thiserror::Error;

/// Why an input file contributed nothing to the output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    #[error("top-level JSON is not an object")]
    NotAnObject,

    #[error("no 'file_path' field")]
    MissingFilePath,

    #[error("'file_path' is not a string")]
    InvalidFilePath,

    #[error("output of a previous run")]
    PreviousOutput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// Record appended to the group for this key
    Grouped { file_path: String },
    Skipped(SkipReason),
    /// The file could not be read at all
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupOutcome {
    Written {
        file_name: String,
        records: usize,
        // key of an earlier group whose file this one replaced
        overwrote: Option<String>,
    },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct GroupReport {
    pub file_path: String,
    pub outcome: GroupOutcome,
}

/// Everything a run did, one entry per input file and per group.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub inputs_found: usize,
    pub groups: usize,
    pub dry_run: bool,
    pub files: Vec<FileReport>,
    pub outputs: Vec<GroupReport>,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Number of consolidated files written (or that would be, in a dry run).
    pub fn created(&self) -> usize {
        self.outputs
            .iter()
            .filter(|r| matches!(r.outcome, GroupOutcome::Written { .. }))
            .count()
    }

    pub fn grouped(&self) -> usize {
        self.files
            .iter()
            .filter(|r| matches!(r.outcome, FileOutcome::Grouped { .. }))
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&PathBuf, &SkipReason)> {
        self.files.iter().filter_map(|r| match &r.outcome {
            FileOutcome::Skipped(reason) => Some((&r.path, reason)),
            _ => None,
        })
    }

    pub fn failed_groups(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outputs.iter().filter_map(|r| match &r.outcome {
            GroupOutcome::Failed(e) => Some((r.file_path.as_str(), e.as_str())),
            _ => None,
        })
    }

    /// Problems the operator should look at. Stale outputs from an
    /// earlier run are expected and not counted.
    pub fn warnings(&self) -> usize {
        let files = self
            .files
            .iter()
            .filter(|r| match &r.outcome {
                FileOutcome::Grouped { .. } => false,
                FileOutcome::Skipped(SkipReason::PreviousOutput) => false,
                _ => true,
            })
            .count();
        let collisions = self
            .outputs
            .iter()
            .filter(|r| {
                matches!(
                    r.outcome,
                    GroupOutcome::Written {
                        overwrote: Some(_),
                        ..
                    }
                )
            })
            .count();
        files + collisions + self.failed_groups().count()
    }
}
