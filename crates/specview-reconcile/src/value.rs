//! Extracting `(type, value)` from variable records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type reported when a record carries none.
pub const UNKNOWN_TYPE: &str = "Unknown";

/// Value reported when a record carries none.
pub const MISSING_VALUE: &str = "N/A";

/// The `(type, value)` pair of one variable record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedValue {
    /// First slot, or [`UNKNOWN_TYPE`].
    #[serde(rename = "type")]
    pub ty: String,
    /// Second slot, or [`MISSING_VALUE`].
    pub value: String,
}

/// Parse a `[type, value]` record.
///
/// Missing or null slots, and records that are not arrays at all, fall back
/// to [`UNKNOWN_TYPE`] and [`MISSING_VALUE`]. Non-string slots are rendered
/// as compact JSON.
pub fn parse_value(record: &Value) -> ParsedValue {
    let slot = |index: usize| {
        record
            .as_array()
            .and_then(|pair| pair.get(index))
            .and_then(text_of)
    };
    ParsedValue {
        ty: slot(0).unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
        value: slot(1).unwrap_or_else(|| MISSING_VALUE.to_string()),
    }
}

/// Text of a JSON scalar; `None` for null.
pub(crate) fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
