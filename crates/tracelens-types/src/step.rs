use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One recorded instant of program execution: variable bindings, the source
/// line, and the call-hierarchy node the instant belongs to.
///
/// The backend emits steps in execution order without an explicit index;
/// `index` is filled (or checked) against the array position when a trace is
/// loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    /// Position in the step sequence (0-based, dense)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// Source line currently executing, if applicable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,

    /// Enclosing function name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Variable name -> current value (JSON-shaped)
    #[serde(default)]
    pub variables: BTreeMap<String, Value>,

    /// Call-hierarchy node this step belongs to (absent for top-level steps)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,

    /// Enclosing call of `call_id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Call-stack depth at this instant
    #[serde(default)]
    pub stack_depth: usize,

    #[serde(default)]
    pub event_type: StepEventType,

    /// Present on `Return` steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_value: Option<Value>,

    #[serde(default)]
    pub error: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Captured stdout; the backend attaches it to the final step only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// What kind of instant a step records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepEventType {
    /// An ordinary line execution
    #[default]
    Step,
    /// A function returning to its caller
    Return,
    /// An uncaught exception propagating
    Exception,
}

impl Step {
    /// A minimal step at a source line, for construction in code.
    pub fn at_line(line: u32) -> Self {
        Self {
            index: None,
            line: Some(line),
            function: None,
            variables: BTreeMap::new(),
            call_id: None,
            parent_id: None,
            stack_depth: 0,
            event_type: StepEventType::Step,
            return_value: None,
            error: false,
            error_message: None,
            output: None,
        }
    }
}
