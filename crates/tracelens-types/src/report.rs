use crate::{CallRecord, Complexity, Result, Step, TableSpec, TableUpdateEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The backend's full answer to one debug request.
///
/// On failure only `success: false` (and possibly `error`) is meaningful; no
/// partial trace data may be adopted from such a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    #[serde(default)]
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_states: Option<DebugReport>,

    /// Newer backends put complexity at the top level; see
    /// [`DebugResponse::complexity`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The trace payload nested under `debugStates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    /// Ordered step sequence
    #[serde(default)]
    pub debug_states: Vec<Step>,

    /// Flat pre-order call hierarchy
    #[serde(default)]
    pub call_hierarchy: Vec<CallRecord>,

    /// Signals the table-reconstruction path is active
    #[serde(default)]
    pub dp_visualization: bool,

    /// Table name -> definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dp_tables: Option<BTreeMap<String, TableSpec>>,

    /// Table mutation log, in emission order
    #[serde(default)]
    pub dp_updates: Vec<TableUpdateEvent>,

    /// Original tracer nested complexity here rather than on the envelope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

impl DebugResponse {
    /// Parse a raw backend response body.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Complexity metadata, wherever the backend put it.
    pub fn complexity(&self) -> Option<&Complexity> {
        self.complexity
            .as_ref()
            .or_else(|| self.debug_states.as_ref()?.complexity.as_ref())
    }
}

impl DebugReport {
    /// Whether DP visualization applies to this trace.
    pub fn is_dp_active(&self) -> bool {
        self.dp_visualization || self.dp_tables.as_ref().is_some_and(|t| !t.is_empty())
    }
}
