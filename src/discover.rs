use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::ConsolidateError;

pub const INPUT_SUFFIX: &str = ".json";

/// Regular files directly inside `dir` whose name ends in `.json`, sorted by
/// name. An empty list is not an error.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, ConsolidateError> {
    if !dir.is_dir() {
        return Err(ConsolidateError::DirectoryNotFound(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| ConsolidateError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut inputs: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| has_input_suffix(path) && path.is_file())
        .collect();
    inputs.sort();
    Ok(inputs)
}

// raw bytes, so names that are not valid UTF-8 still count
fn has_input_suffix(path: &Path) -> bool {
    path.file_name()
        .map_or(false, |name| name.as_encoded_bytes().ends_with(INPUT_SUFFIX.as_bytes()))
}
