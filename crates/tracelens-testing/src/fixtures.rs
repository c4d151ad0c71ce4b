use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracelens_types::{
    CallRecord, Complexity, DebugReport, DebugResponse, Step, StepEventType, TableKind, TableSpec,
    TableUpdateEvent,
};

/// Step count of [`fib_dp_report`].
pub const FIB_DP_STEPS: usize = 10;

/// A step of [`fib_recursive_report`] that lies inside the innermost call
/// `fib_3` (fib(1) under fib(2) under fib(3)).
pub const FIB3_INNER_STEP: usize = 4;

fn step(line: u32, function: &str, variables: &[(&str, Value)]) -> Step {
    let mut built = Step::at_line(line);
    built.function = Some(function.to_string());
    built.variables = variables
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    built
}

fn in_call(mut step: Step, call_id: &str, stack_depth: usize) -> Step {
    step.call_id = Some(call_id.to_string());
    step.stack_depth = stack_depth;
    step
}

fn call(
    id: &str,
    parent_id: Option<&str>,
    function_name: &str,
    arguments: &[Value],
    return_value: Value,
    start_step: usize,
    end_step: usize,
) -> CallRecord {
    CallRecord {
        id: id.to_string(),
        parent_id: parent_id.map(str::to_string),
        function_name: function_name.to_string(),
        arguments: arguments.to_vec(),
        return_value: Some(return_value),
        start_step,
        end_step,
        entry_line: None,
    }
}

fn update(step_index: usize, table_name: &str, value: Value) -> TableUpdateEvent {
    TableUpdateEvent {
        step_index,
        table_name: table_name.to_string(),
        value,
    }
}

/// The trace of a tabulated fibonacci run (`fib_dp(5)` filling a 1-D `dp`
/// table), with call hierarchy, update log, complexity, and captured output.
pub fn fib_dp_report() -> DebugReport {
    let mut steps = vec![
        step(14, "<module>", &[]),
        in_call(step(3, "fib_dp", &[("n", json!(5))]), "fib_dp_1", 1),
        in_call(
            step(4, "fib_dp", &[("n", json!(5)), ("dp", json!([0, 0, 0, 0, 0, 0]))]),
            "fib_dp_1",
            1,
        ),
        in_call(step(5, "fib_dp", &[("n", json!(5))]), "fib_dp_1", 1),
        in_call(step(8, "fib_dp", &[("n", json!(5)), ("i", json!(2))]), "fib_dp_1", 1),
        in_call(step(9, "fib_dp", &[("n", json!(5)), ("i", json!(2))]), "fib_dp_1", 1),
        in_call(step(9, "fib_dp", &[("n", json!(5)), ("i", json!(3))]), "fib_dp_1", 1),
        in_call(step(9, "fib_dp", &[("n", json!(5)), ("i", json!(4))]), "fib_dp_1", 1),
        in_call(step(9, "fib_dp", &[("n", json!(5)), ("i", json!(5))]), "fib_dp_1", 1),
        in_call(step(11, "fib_dp", &[("n", json!(5))]), "fib_dp_1", 1),
    ];
    debug_assert_eq!(steps.len(), FIB_DP_STEPS);

    let last = steps.last_mut().expect("non-empty");
    last.event_type = StepEventType::Return;
    last.return_value = Some(json!(5));
    last.output = Some("5\n".to_string());

    let mut dp_tables = BTreeMap::new();
    dp_tables.insert(
        "dp".to_string(),
        TableSpec {
            kind: TableKind::Sequence1D,
            dimensions: vec![6],
            initial_value: json!([0, 0, 0, 0, 0, 0]),
            final_value: Some(json!([0, 1, 1, 2, 3, 5])),
        },
    );

    DebugReport {
        debug_states: steps,
        call_hierarchy: vec![call(
            "fib_dp_1",
            None,
            "fib_dp",
            &[json!(5)],
            json!(5),
            1,
            9,
        )],
        dp_visualization: true,
        dp_tables: Some(dp_tables),
        dp_updates: vec![
            update(4, "dp", json!([0, 1, 0, 0, 0, 0])),
            update(5, "dp", json!([0, 1, 1, 0, 0, 0])),
            update(6, "dp", json!([0, 1, 1, 2, 0, 0])),
            update(7, "dp", json!([0, 1, 1, 2, 3, 0])),
            update(8, "dp", json!([0, 1, 1, 2, 3, 5])),
        ],
        complexity: Some(Complexity {
            time: "O(n)".to_string(),
            space: "O(n)".to_string(),
            has_loops: true,
            has_dp: true,
            ..Complexity::default()
        }),
    }
}

/// The trace of a naive recursive `fib(3)` run: five pre-order call records
/// with properly nested step ranges and no DP tables.
pub fn fib_recursive_report() -> DebugReport {
    let mut steps: Vec<Step> = Vec::new();
    steps.push(step(6, "<module>", &[]));
    for position in 1..15 {
        let depth = match position {
            1 | 13 => 1,
            2 | 9 | 10 | 12 => 2,
            _ => 3,
        };
        steps.push(in_call(
            step(2, "fib", &[("n", json!(3 - depth + 1))]),
            "fib",
            depth,
        ));
    }

    DebugReport {
        debug_states: steps,
        call_hierarchy: vec![
            call("fib_1", None, "fib", &[json!(3)], json!(2), 1, 13),
            call("fib_2", Some("fib_1"), "fib", &[json!(2)], json!(1), 2, 9),
            call("fib_3", Some("fib_2"), "fib", &[json!(1)], json!(1), 3, 5),
            call("fib_4", Some("fib_2"), "fib", &[json!(0)], json!(0), 6, 8),
            call("fib_5", Some("fib_1"), "fib", &[json!(1)], json!(1), 10, 12),
        ],
        dp_visualization: false,
        dp_tables: None,
        dp_updates: Vec::new(),
        complexity: Some(Complexity {
            time: "O(2^n)".to_string(),
            space: "O(n)".to_string(),
            has_recursion: true,
            ..Complexity::default()
        }),
    }
}

/// A memoized run tracked through a dictionary table with no explicit
/// initial value.
pub fn memo_dict_report() -> DebugReport {
    let mut dp_tables = BTreeMap::new();
    dp_tables.insert(
        "memo".to_string(),
        TableSpec {
            kind: TableKind::Dictionary,
            dimensions: Vec::new(),
            initial_value: Value::Null,
            final_value: Some(json!({"1": 1, "2": 1, "3": 2})),
        },
    );

    DebugReport {
        debug_states: (0..4).map(|i| step(2 + i, "fib_memo", &[])).collect(),
        call_hierarchy: Vec::new(),
        dp_visualization: true,
        dp_tables: Some(dp_tables),
        dp_updates: vec![
            update(1, "memo", json!({"1": 1})),
            update(2, "memo", json!({"1": 1, "2": 1})),
            update(3, "memo", json!({"1": 1, "2": 1, "3": 2})),
        ],
        complexity: None,
    }
}

/// Two sibling top-level calls, forcing the synthetic call-tree root.
pub fn two_top_level_calls_report() -> DebugReport {
    DebugReport {
        debug_states: (0..10).map(|i| step(1 + i, "<module>", &[])).collect(),
        call_hierarchy: vec![
            call("setup_1", None, "setup", &[], Value::Null, 0, 3),
            call("solve_2", None, "solve", &[json!(4)], json!(7), 5, 8),
        ],
        ..DebugReport::default()
    }
}

/// A successful backend envelope around `report`.
pub fn success_response(report: DebugReport) -> DebugResponse {
    DebugResponse {
        success: true,
        debug_states: Some(report),
        complexity: None,
        error: None,
    }
}

/// A failed backend envelope.
pub fn failure_response(message: Option<&str>) -> DebugResponse {
    DebugResponse {
        success: false,
        debug_states: None,
        complexity: None,
        error: message.map(str::to_string),
    }
}

/// Builder for reports with precise control over steps, tables, and the
/// update log.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    steps: Vec<Step>,
    calls: Vec<CallRecord>,
    tables: BTreeMap<String, TableSpec>,
    updates: Vec<TableUpdateEvent>,
}

pub fn report_builder() -> ReportBuilder {
    ReportBuilder::default()
}

impl ReportBuilder {
    /// Append `count` plain steps.
    pub fn steps(mut self, count: usize) -> Self {
        let base = self.steps.len() as u32;
        self.steps
            .extend((0..count as u32).map(|i| Step::at_line(base + i + 1)));
        self
    }

    pub fn call(
        mut self,
        id: &str,
        parent_id: Option<&str>,
        function_name: &str,
        start_step: usize,
        end_step: usize,
    ) -> Self {
        self.calls.push(call(
            id,
            parent_id,
            function_name,
            &[],
            Value::Null,
            start_step,
            end_step,
        ));
        self
    }

    pub fn table_1d(self, name: &str, initial_value: Value) -> Self {
        let dimensions = match &initial_value {
            Value::Array(cells) => vec![cells.len()],
            _ => Vec::new(),
        };
        self.table(name, TableKind::Sequence1D, dimensions, initial_value)
    }

    pub fn table_2d(self, name: &str, initial_value: Value) -> Self {
        let dimensions = match &initial_value {
            Value::Array(rows) => {
                let cols = rows
                    .first()
                    .and_then(|row| row.as_array())
                    .map(|row| row.len())
                    .unwrap_or(0);
                vec![rows.len(), cols]
            }
            _ => Vec::new(),
        };
        self.table(name, TableKind::Sequence2D, dimensions, initial_value)
    }

    pub fn table_dict(self, name: &str) -> Self {
        self.table(name, TableKind::Dictionary, Vec::new(), Value::Null)
    }

    fn table(
        mut self,
        name: &str,
        kind: TableKind,
        dimensions: Vec<usize>,
        initial_value: Value,
    ) -> Self {
        self.tables.insert(
            name.to_string(),
            TableSpec {
                kind,
                dimensions,
                initial_value,
                final_value: None,
            },
        );
        self
    }

    pub fn update(mut self, step_index: usize, table_name: &str, value: Value) -> Self {
        self.updates.push(update(step_index, table_name, value));
        self
    }

    pub fn build(self) -> DebugReport {
        let dp_visualization = !self.tables.is_empty();
        DebugReport {
            debug_states: self.steps,
            call_hierarchy: self.calls,
            dp_visualization,
            dp_tables: (!self.tables.is_empty()).then_some(self.tables),
            dp_updates: self.updates,
            complexity: None,
        }
    }
}
