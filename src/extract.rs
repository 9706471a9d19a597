use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::report::SkipReason;

pub const FILE_PATH_KEY: &str = "file_path";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The fields of one result file that consolidation cares about.
/// Everything else in the file (quality, scale_factor, payload, ...) is ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct InputRecord {
    file_path: String,
    #[serde(default)]
    output_path: Option<Value>,
    #[serde(default)]
    response: Option<Value>,
}

/// One entry of a consolidated list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReducedRecord {
    pub output_path: Value,
    pub response: Value,
}

impl InputRecord {
    fn into_keyed(self) -> (String, ReducedRecord) {
        let record = ReducedRecord {
            output_path: self.output_path.unwrap_or(Value::Null),
            response: self.response.unwrap_or(Value::Null),
        };
        (self.file_path, record)
    }
}

/// Parse one candidate file and pull out its grouping key and reduced record.
pub fn extract_record(raw: &[u8]) -> Result<(String, ReducedRecord), SkipReason> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let json: Value =
        serde_json::from_slice(raw).map_err(|e| SkipReason::InvalidJson(e.to_string()))?;

    let Value::Object(obj) = json else {
        return Err(SkipReason::NotAnObject);
    };
    match obj.get(FILE_PATH_KEY) {
        None => return Err(SkipReason::MissingFilePath),
        Some(Value::String(_)) => {}
        Some(_) => return Err(SkipReason::InvalidFilePath),
    }

    let input: InputRecord =
        serde_json::from_value(Value::Object(obj)).map_err(|_| SkipReason::InvalidFilePath)?;
    Ok(input.into_keyed())
}
