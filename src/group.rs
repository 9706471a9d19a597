use std::collections::HashMap;

use crate::extract::ReducedRecord;

/// Reduced records keyed by `file_path`, keys kept in first-seen order and
/// records in push order.
#[derive(Debug, Default)]
pub struct Groups {
    index: HashMap<String, usize>,
    entries: Vec<(String, Vec<ReducedRecord>)>,
}

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file_path: String, record: ReducedRecord) {
        match self.index.get(&file_path) {
            Some(&i) => self.entries[i].1.push(record),
            None => {
                self.index.insert(file_path.clone(), self.entries.len());
                self.entries.push((file_path, vec![record]));
            }
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_records(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    pub fn get(&self, file_path: &str) -> Option<&[ReducedRecord]> {
        self.index
            .get(file_path)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ReducedRecord])> {
        self.entries
            .iter()
            .map(|(key, records)| (key.as_str(), records.as_slice()))
    }
}
