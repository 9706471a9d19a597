use std::{
    collections::HashMap,
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::{
    extract::ReducedRecord,
    report::{GroupOutcome, GroupReport},
};

pub const OUTPUT_SUFFIX: &str = "-consolidated.json";

/// `<stem of the last path segment>-consolidated.json`.
///
/// Both `/` and `\` count as separators so the name never points outside the
/// target directory, whatever platform produced the key. Leading dots belong
/// to the stem (`.env.json` -> `.env`).
pub fn output_file_name(file_path: &str) -> String {
    let base = file_path.rsplit(['/', '\\']).next().unwrap_or(file_path);
    let dots = base.len() - base.trim_start_matches('.').len();
    let stem = match base[dots..].rfind('.') {
        Some(i) => &base[..dots + i],
        None => base,
    };
    format!("{stem}{OUTPUT_SUFFIX}")
}

pub fn is_previous_output(path: &Path) -> bool {
    path.file_name()
        .map_or(false, |name| name.as_encoded_bytes().ends_with(OUTPUT_SUFFIX.as_bytes()))
}

/// `{ file_path: [records...] }` as pretty-printed JSON.
pub fn render_group(file_path: &str, records: &[ReducedRecord]) -> serde_json::Result<String> {
    let mut doc = Map::new();
    doc.insert(file_path.to_owned(), serde_json::to_value(records)?);
    serde_json::to_string_pretty(&Value::Object(doc))
}

/// Writes one consolidated file per group into a single directory and keeps
/// track of which key owns each file name.
pub struct OutputWriter<'a> {
    dir: &'a Path,
    dry_run: bool,
    claimed: HashMap<String, String>,
}

impl<'a> OutputWriter<'a> {
    pub fn new(dir: &'a Path, dry_run: bool) -> Self {
        Self {
            dir,
            dry_run,
            claimed: HashMap::new(),
        }
    }

    pub fn write_group(&mut self, file_path: &str, records: &[ReducedRecord]) -> GroupReport {
        let file_name = output_file_name(file_path);
        let out_path = self.dir.join(&file_name);

        let outcome = match self.emit(&out_path, file_path, records) {
            Ok(()) => {
                // last writer wins on a name clash; remember who lost
                let overwrote = self
                    .claimed
                    .insert(file_name.clone(), file_path.to_owned());
                GroupOutcome::Written {
                    file_name,
                    records: records.len(),
                    overwrote,
                }
            }
            Err(e) => GroupOutcome::Failed(format!("{e:#}")),
        };

        GroupReport {
            file_path: file_path.to_owned(),
            outcome,
        }
    }

    fn emit(&self, out_path: &Path, file_path: &str, records: &[ReducedRecord]) -> Result<()> {
        let text = render_group(file_path, records).context("serializing group")?;
        if !self.dry_run {
            fs::write(out_path, text).with_context(|| format!("writing {}", out_path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn rec(output_path: &str, response: Value) -> ReducedRecord {
        ReducedRecord {
            output_path: json!(output_path),
            response,
        }
    }

    #[test]
    fn derives_names_from_last_segment_stem() {
        assert_eq!(output_file_name("/a/b.json"), "b-consolidated.json");
        assert_eq!(output_file_name("imgs/photo.final.png"), "photo.final-consolidated.json");
        assert_eq!(output_file_name(r"C:\shots\cat.jpg"), "cat-consolidated.json");
        assert_eq!(output_file_name("README"), "README-consolidated.json");
        assert_eq!(output_file_name("/x/.hidden"), ".hidden-consolidated.json");
        assert_eq!(output_file_name("/x/.env.json"), ".env-consolidated.json");
        assert_eq!(output_file_name("/x/y/"), "-consolidated.json");
        assert_eq!(output_file_name(""), "-consolidated.json");
    }

    #[test]
    fn recognises_previous_outputs() {
        assert!(is_previous_output(Path::new("/d/b-consolidated.json")));
        assert!(!is_previous_output(Path::new("/d/b.json")));
    }

    #[cfg(unix)]
    #[test]
    fn recognises_previous_outputs_with_non_utf8_names() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

        let name = OsStr::from_bytes(b"caf\xE9-consolidated.json");
        assert!(is_previous_output(&Path::new("/d").join(name)));
    }

    #[test]
    fn renders_deeply_nested_values_exactly() {
        let mut deep = json!("leaf");
        for i in 0..16 {
            deep = json!({ format!("level{i}"): [deep] });
        }
        let records = vec![rec("/out", deep.clone())];

        let text = render_group("/a/b.json", &records).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed,
            json!({"/a/b.json": [{"output_path": "/out", "response": deep}]})
        );
    }

    #[test]
    fn later_group_overwrites_clashing_name() {
        let tmp = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(tmp.path(), false);

        let first = writer.write_group("a/x.json", &[rec("1", json!("first"))]);
        let second = writer.write_group("b/x.json", &[rec("2", json!("second"))]);

        assert!(matches!(
            first.outcome,
            GroupOutcome::Written { overwrote: None, .. }
        ));
        assert_eq!(
            second.outcome,
            GroupOutcome::Written {
                file_name: "x-consolidated.json".into(),
                records: 1,
                overwrote: Some("a/x.json".into()),
            }
        );

        let on_disk: Value =
            serde_json::from_str(&fs::read_to_string(tmp.path().join("x-consolidated.json")).unwrap())
                .unwrap();
        assert_eq!(on_disk, json!({"b/x.json": [{"output_path": "2", "response": "second"}]}));
    }

    #[test]
    fn write_failure_is_reported_not_raised() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("b-consolidated.json")).unwrap();
        let mut writer = OutputWriter::new(tmp.path(), false);

        let report = writer.write_group("/a/b.json", &[rec("/out", json!("ok"))]);
        assert_eq!(report.file_path, "/a/b.json");
        match report.outcome {
            GroupOutcome::Failed(reason) => assert!(reason.contains("b-consolidated.json")),
            other => panic!("expected failure, got {other:?}"),
        }

        // the writer keeps going
        let next = writer.write_group("/a/c.json", &[rec("/out", json!("ok"))]);
        assert!(matches!(next.outcome, GroupOutcome::Written { .. }));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut writer = OutputWriter::new(tmp.path(), true);
        let report = writer.write_group("/a/b.json", &[rec("/out", json!("ok"))]);
        assert!(matches!(report.outcome, GroupOutcome::Written { records: 1, .. }));
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }
}
