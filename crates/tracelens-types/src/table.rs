use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Shape of a tracked DP table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    /// Unordered string-keyed mapping
    #[serde(rename = "dictionary", alias = "dict")]
    Dictionary,
    /// Ordered one-dimensional sequence
    #[serde(rename = "sequence-1d")]
    Sequence1D,
    /// Rows of cells; rows may be ragged if the source data is
    #[serde(rename = "sequence-2d")]
    Sequence2D,
}

impl TableKind {
    /// The empty value of this shape, used when a definition carries no
    /// explicit initial value.
    pub fn empty_value(self) -> Value {
        match self {
            TableKind::Dictionary => Value::Object(serde_json::Map::new()),
            TableKind::Sequence1D | TableKind::Sequence2D => Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableKind::Dictionary => "dictionary",
            TableKind::Sequence1D => "sequence-1d",
            TableKind::Sequence2D => "sequence-2d",
        };
        f.write_str(name)
    }
}

/// Wire-side definition of one tracked table. The table name is the key of
/// the `dpTables` map, so it does not appear here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSpec {
    #[serde(alias = "type")]
    pub kind: TableKind,

    /// Extents for sequence kinds (1 or 2 integers); empty for dictionaries
    #[serde(default)]
    pub dimensions: Vec<usize>,

    /// Contents before any update event applies; null means "empty for the
    /// kind"
    #[serde(default)]
    pub initial_value: Value,

    /// Backend-supplied terminal state, served by the complete view mode
    #[serde(default, rename = "values", skip_serializing_if = "Option::is_none")]
    pub final_value: Option<Value>,
}

/// One mutation of a table, tied to the step at which it became visible.
///
/// `value` is the full replacement snapshot of the table, not a delta. Events
/// for one table are non-decreasing in `step_index`; when two share a step,
/// the later one in log order is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableUpdateEvent {
    #[serde(alias = "step")]
    pub step_index: usize,

    #[serde(alias = "table")]
    pub table_name: String,

    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_kind_names() {
        assert_eq!(
            serde_json::from_str::<TableKind>("\"dictionary\"").unwrap(),
            TableKind::Dictionary
        );
        assert_eq!(
            serde_json::from_str::<TableKind>("\"dict\"").unwrap(),
            TableKind::Dictionary
        );
        assert_eq!(
            serde_json::from_str::<TableKind>("\"sequence-2d\"").unwrap(),
            TableKind::Sequence2D
        );
        assert!(serde_json::from_str::<TableKind>("\"matrix\"").is_err());
    }

    #[test]
    fn spec_defaults_to_null_initial_value() {
        let spec: TableSpec = serde_json::from_str(
            r#"{"kind": "sequence-1d", "dimensions": [6], "values": [0, 1, 1, 2, 3, 5]}"#,
        )
        .expect("valid spec");

        assert_eq!(spec.kind, TableKind::Sequence1D);
        assert!(spec.initial_value.is_null());
        assert_eq!(spec.final_value, Some(json!([0, 1, 1, 2, 3, 5])));
    }

    #[test]
    fn update_event_accepts_legacy_aliases() {
        let event: TableUpdateEvent =
            serde_json::from_str(r#"{"step": 4, "table": "dp", "value": [0, 1, 0]}"#)
                .expect("valid event");
        assert_eq!(event.step_index, 4);
        assert_eq!(event.table_name, "dp");

        let event: TableUpdateEvent =
            serde_json::from_str(r#"{"stepIndex": 4, "tableName": "dp", "value": {}}"#)
                .expect("valid event");
        assert_eq!(event.step_index, 4);
    }

    #[test]
    fn empty_values_match_kind() {
        assert_eq!(TableKind::Dictionary.empty_value(), json!({}));
        assert_eq!(TableKind::Sequence1D.empty_value(), json!([]));
    }
}
