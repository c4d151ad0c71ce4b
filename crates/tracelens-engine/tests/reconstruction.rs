use serde_json::json;
use std::fs;
use std::path::Path;
use tracelens_engine::{CallTree, TableView, Trace, materialize, summarize, variables_at};
use tracelens_types::DebugResponse;

// Helper to load a backend response from fixture JSON
fn load_response(fixture_name: &str) -> DebugResponse {
    let path = Path::new("tests/fixtures").join(fixture_name);
    let content = fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Failed to read fixture: {}", path.display()));
    DebugResponse::from_json(&content)
        .unwrap_or_else(|_| panic!("Failed to parse fixture: {}", path.display()))
}

#[test]
fn reconstructs_fib_dp_trace_end_to_end() {
    let response = load_response("fib_dp_response.json");
    assert!(response.success);

    let complexity = response.complexity().expect("complexity present");
    assert_eq!(complexity.time, "O(n)");
    assert!(complexity.has_dp);

    let report = response.debug_states.expect("report present");
    let trace = Trace::from_report(report).expect("valid trace");

    assert_eq!(trace.step_count(), 10);
    assert!(trace.is_dp_active());
    for i in 0..trace.step_count() {
        assert_eq!(trace.step_at(i).expect("in range").index, Some(i));
    }

    // Variables panel at the first loop iteration
    let vars = variables_at(&trace, 4);
    assert_eq!(vars["i"], json!(2));
    assert_eq!(vars["n"], json!(5));

    // DP table evolution along the timeline
    let cases = [
        (0, json!([0, 0, 0, 0, 0, 0])),
        (4, json!([0, 1, 0, 0, 0, 0])),
        (6, json!([0, 1, 1, 2, 0, 0])),
        (9, json!([0, 1, 1, 2, 3, 5])),
    ];
    for (at_step, expected) in cases {
        let snap = materialize(&trace, "dp", TableView::Stepwise(at_step)).expect("declared");
        assert_eq!(snap.value, expected, "table at step {}", at_step);
        assert_eq!(snap.cells().len(), 6);
    }

    let complete = materialize(&trace, "dp", TableView::Complete).expect("declared");
    assert_eq!(complete.value, json!([0, 1, 1, 2, 3, 5]));

    // Call tree: single top-level call, active over the function body
    let tree = CallTree::build(trace.call_records()).expect("valid hierarchy");
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.root().function_name, "fib_dp");
    assert!(!tree.root().is_synthetic());

    let path = tree.active_path(5);
    assert_eq!(path.len(), 1);
    assert_eq!(path[0].id, "fib_dp_1");
    assert!(tree.active_path(0).is_empty(), "module step is outside the call");

    // Summary projection
    let summary = summarize(&trace);
    assert_eq!(summary.step_count, 10);
    assert_eq!(summary.call_count, 1);
    assert_eq!(summary.max_stack_depth, 1);
    assert!(!summary.has_error);
}

#[test]
fn malformed_fixture_fails_without_partial_state() {
    let response = load_response("fib_dp_response.json");
    let mut report = response.debug_states.expect("report present");

    // Point an update at a table that was never declared
    report.dp_updates[0].table_name = "ghost".to_string();

    let err = Trace::from_report(report).expect_err("undeclared table must fail");
    assert!(err.to_string().contains("ghost"));
}
