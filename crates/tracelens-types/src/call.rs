use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One function invocation from the flat call hierarchy.
///
/// Records are emitted in pre-order: a `parent_id` always refers to a record
/// appearing earlier in the list. The trace is complete and static, so every
/// call is closed and `end_step` is always present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRecord {
    #[serde(alias = "call_id")]
    pub id: String,

    /// Enclosing call, absent for top-level invocations
    #[serde(default, alias = "parent_id", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(alias = "function")]
    pub function_name: String,

    #[serde(default)]
    pub arguments: Vec<Value>,

    /// Absent only while the call is still open, which a finished trace
    /// never contains
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<Value>,

    /// First step index belonging to this call
    pub start_step: usize,

    /// Last step index belonging to this call; a child's range is contained
    /// in its parent's
    pub end_step: usize,

    /// Source line of the function entry
    #[serde(default, alias = "entry_line", skip_serializing_if = "Option::is_none")]
    pub entry_line: Option<u32>,
}

impl CallRecord {
    /// Whether `position` falls inside this call's step range.
    pub fn spans(&self, position: usize) -> bool {
        self.start_step <= position && position <= self.end_step
    }
}
