use crate::store::Trace;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate statistics over a whole trace, the data source for the
/// recursion analytics panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraceSummary {
    pub step_count: usize,
    pub call_count: usize,
    /// Deepest call stack observed across all steps
    pub max_stack_depth: usize,
    /// Function name -> number of recorded invocations
    pub calls_per_function: BTreeMap<String, usize>,
    pub has_error: bool,
}

/// Summarize trace statistics.
pub fn summarize(trace: &Trace) -> TraceSummary {
    let mut calls_per_function: BTreeMap<String, usize> = BTreeMap::new();
    for call in trace.call_records() {
        *calls_per_function
            .entry(call.function_name.clone())
            .or_insert(0) += 1;
    }

    TraceSummary {
        step_count: trace.step_count(),
        call_count: trace.call_records().len(),
        max_stack_depth: trace
            .steps()
            .iter()
            .map(|step| step.stack_depth)
            .max()
            .unwrap_or(0),
        calls_per_function,
        has_error: trace.steps().iter().any(|step| step.error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelens_testing::fixtures;
    use tracelens_types::DebugReport;

    #[test]
    fn counts_calls_per_function() {
        let trace = Trace::from_report(fixtures::fib_recursive_report()).expect("valid");
        let summary = summarize(&trace);

        assert_eq!(summary.call_count, 5);
        assert_eq!(summary.calls_per_function["fib"], 5);
        assert!(!summary.has_error);
        assert!(summary.max_stack_depth >= 2);
    }

    #[test]
    fn empty_trace_summarizes_to_defaults() {
        let trace = Trace::from_report(DebugReport::default()).expect("valid");
        assert_eq!(summarize(&trace), TraceSummary::default());
    }
}
