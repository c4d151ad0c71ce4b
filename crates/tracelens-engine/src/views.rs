use crate::store::Trace;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracelens_types::StepEventType;

/// Variable bindings at `position`. Out-of-range positions (including any
/// position on an empty trace) yield an empty mapping, never an error.
pub fn variables_at(trace: &Trace, position: usize) -> BTreeMap<String, Value> {
    trace
        .steps()
        .get(position)
        .map(|step| step.variables.clone())
        .unwrap_or_default()
}

/// Source line executing at `position`, if the step has one.
pub fn line_for_step(trace: &Trace, position: usize) -> Option<u32> {
    trace.steps().get(position).and_then(|step| step.line)
}

/// Timeline chip data for one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepEvent {
    pub event_type: StepEventType,
    pub function: Option<String>,
    pub return_value: Option<Value>,
    pub error_message: Option<String>,
}

pub fn step_event_at(trace: &Trace, position: usize) -> Option<StepEvent> {
    trace.steps().get(position).map(|step| StepEvent {
        event_type: step.event_type,
        function: step.function.clone(),
        return_value: step.return_value.clone(),
        error_message: step.error_message.clone(),
    })
}

/// Captured stdout of the traced program; the backend attaches it to the
/// final step.
pub fn output(trace: &Trace) -> Option<&str> {
    trace
        .steps()
        .iter()
        .rev()
        .find_map(|step| step.output.as_deref())
}
