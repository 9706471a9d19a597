use std::{io, path::PathBuf};

use thiserror::Error;

/// Conditions that stop a run before any input is processed.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    #[error("{} is not a valid directory", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
