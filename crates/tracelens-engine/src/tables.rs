use crate::error::{Error, Result};
use crate::store::{TableDefinition, Trace};
use serde::Serialize;
use serde_json::Value;
use tracelens_types::TableKind;

/// Which point in time a table should be materialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableView {
    /// The table as of the given step: every update with
    /// `step_index <= at_step` applied, in log order
    Stepwise(usize),
    /// The backend-declared terminal state, independent of the cursor
    Complete,
}

/// Materialized contents of one table at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSnapshot {
    pub name: String,
    pub kind: TableKind,
    pub dimensions: Vec<usize>,
    pub value: Value,
}

impl TableSnapshot {
    /// Dictionary entries; empty for non-mapping values. Key order carries
    /// no meaning.
    pub fn entries(&self) -> Vec<(&String, &Value)> {
        match &self.value {
            Value::Object(map) => map.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// Cells of a 1-D sequence, in order.
    pub fn cells(&self) -> &[Value] {
        match &self.value {
            Value::Array(items) => items,
            _ => &[],
        }
    }

    /// Rows of a 2-D sequence. Rows are returned exactly as supplied, so a
    /// ragged source stays ragged; a non-sequence row renders as one cell.
    pub fn rows(&self) -> Vec<&[Value]> {
        match &self.value {
            Value::Array(rows) => rows
                .iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.as_slice(),
                    other => std::slice::from_ref(other),
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Materialize one declared table.
///
/// Reconstruction always folds from the declared initial value rather than
/// patching a running table, so moving the cursor backward needs no
/// un-apply step. Events carry full replacement snapshots: the last
/// qualifying event wins outright, and for events sharing a step index the
/// later one in log order is authoritative.
pub fn materialize(trace: &Trace, name: &str, view: TableView) -> Result<TableSnapshot> {
    let def = trace
        .table_definition(name)
        .ok_or_else(|| Error::UnknownTable(name.to_string()))?;

    let value = match view {
        TableView::Stepwise(at_step) => fold(trace, def, at_step),
        TableView::Complete => def
            .final_value
            .clone()
            .unwrap_or_else(|| fold(trace, def, usize::MAX)),
    };

    Ok(TableSnapshot {
        name: def.name.clone(),
        kind: def.kind,
        dimensions: def.dimensions.clone(),
        value,
    })
}

/// Materialize every declared table, in declaration order.
pub fn materialize_all(trace: &Trace, view: TableView) -> Result<Vec<TableSnapshot>> {
    trace
        .table_definitions()
        .iter()
        .map(|def| materialize(trace, &def.name, view))
        .collect()
}

fn fold(trace: &Trace, def: &TableDefinition, at_step: usize) -> Value {
    let mut value = def.initial_value.clone();
    for update in trace.table_updates() {
        if update.table_name == def.name && update.step_index <= at_step {
            value = update.value.clone();
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tracelens_testing::fixtures;
    use tracelens_types::DebugReport;

    fn three_step_dp_trace() -> Trace {
        // Trace with 3 steps, one sequence-1d table "dp" starting [0,0,0],
        // and a single update at step 1.
        let report = fixtures::report_builder()
            .steps(3)
            .table_1d("dp", json!([0, 0, 0]))
            .update(1, "dp", json!([0, 1, 0]))
            .build();
        Trace::from_report(report).expect("valid trace")
    }

    #[test]
    fn before_first_update_yields_initial_value() {
        let trace = three_step_dp_trace();
        let snap = materialize(&trace, "dp", TableView::Stepwise(0)).expect("declared");
        assert_eq!(snap.value, json!([0, 0, 0]));
    }

    #[test]
    fn update_becomes_visible_at_its_step() {
        let trace = three_step_dp_trace();
        let snap = materialize(&trace, "dp", TableView::Stepwise(1)).expect("declared");
        assert_eq!(snap.value, json!([0, 1, 0]));
    }

    #[test]
    fn update_stays_visible_after_its_step() {
        let trace = three_step_dp_trace();
        let snap = materialize(&trace, "dp", TableView::Stepwise(2)).expect("declared");
        assert_eq!(snap.value, json!([0, 1, 0]));
    }

    #[test]
    fn fold_depends_only_on_events_up_to_the_step() {
        // Appending an event past step k must not change the result for k.
        let base = fixtures::report_builder()
            .steps(5)
            .table_1d("dp", json!([0, 0, 0]))
            .update(1, "dp", json!([0, 1, 0]))
            .build();
        let extended = fixtures::report_builder()
            .steps(5)
            .table_1d("dp", json!([0, 0, 0]))
            .update(1, "dp", json!([0, 1, 0]))
            .update(4, "dp", json!([9, 9, 9]))
            .build();

        let before = Trace::from_report(base).expect("valid");
        let after = Trace::from_report(extended).expect("valid");

        for k in 0..4 {
            assert_eq!(
                materialize(&before, "dp", TableView::Stepwise(k)).unwrap().value,
                materialize(&after, "dp", TableView::Stepwise(k)).unwrap().value,
                "step {} changed after appending a later event",
                k
            );
        }
    }

    #[test]
    fn same_step_events_resolve_by_log_order() {
        let report = fixtures::report_builder()
            .steps(5)
            .table_1d("dp", json!(["init"]))
            .update(3, "dp", json!(["A"]))
            .update(3, "dp", json!(["B"]))
            .build();
        let trace = Trace::from_report(report).expect("valid");

        let at3 = materialize(&trace, "dp", TableView::Stepwise(3)).unwrap();
        assert_eq!(at3.value, json!(["B"]));

        let at2 = materialize(&trace, "dp", TableView::Stepwise(2)).unwrap();
        assert_eq!(at2.value, json!(["init"]));
    }

    #[test]
    fn complete_view_returns_declared_terminal_state() {
        let trace = Trace::from_report(fixtures::fib_dp_report()).expect("valid");
        let snap = materialize(&trace, "dp", TableView::Complete).expect("declared");
        assert_eq!(snap.value, json!([0, 1, 1, 2, 3, 5]));
    }

    #[test]
    fn complete_view_falls_back_to_full_fold() {
        let report = fixtures::report_builder()
            .steps(3)
            .table_1d("dp", json!([0]))
            .update(0, "dp", json!([1]))
            .update(2, "dp", json!([2]))
            .build();
        let trace = Trace::from_report(report).expect("valid");

        let snap = materialize(&trace, "dp", TableView::Complete).unwrap();
        assert_eq!(snap.value, json!([2]));
    }

    #[test]
    fn unknown_table_fails() {
        let trace = three_step_dp_trace();
        assert!(matches!(
            materialize(&trace, "memo", TableView::Complete),
            Err(Error::UnknownTable(name)) if name == "memo"
        ));
    }

    #[test]
    fn dictionary_table_entries() {
        let trace = Trace::from_report(fixtures::memo_dict_report()).expect("valid");
        let snap = materialize(&trace, "memo", TableView::Complete).expect("declared");
        assert_eq!(snap.kind, TableKind::Dictionary);

        let entries = snap.entries();
        assert!(entries.iter().any(|(k, v)| *k == "3" && **v == json!(2)));
    }

    #[test]
    fn ragged_2d_rows_render_as_supplied() {
        let report = fixtures::report_builder()
            .steps(2)
            .table_2d("grid", json!([[]]))
            .update(1, "grid", json!([[1, 2, 3], [4], [5, 6]]))
            .build();
        let trace = Trace::from_report(report).expect("valid");

        let snap = materialize(&trace, "grid", TableView::Stepwise(1)).unwrap();
        let rows = snap.rows();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[2], &[json!(5), json!(6)][..]);
    }

    #[test]
    fn materialize_all_preserves_declaration_order() {
        let report = fixtures::report_builder()
            .steps(2)
            .table_1d("a", json!([0]))
            .table_1d("b", json!([1]))
            .update(0, "b", json!([7]))
            .build();
        let trace = Trace::from_report(report).expect("valid");

        let snaps = materialize_all(&trace, TableView::Stepwise(1)).unwrap();
        assert_eq!(snaps.len(), 2);
        assert_eq!(snaps[0].name, "a");
        assert_eq!(snaps[0].value, json!([0]));
        assert_eq!(snaps[1].value, json!([7]));
    }

    #[test]
    fn inert_without_table_definitions() {
        let trace = Trace::from_report(DebugReport::default()).expect("valid");
        assert!(!trace.is_dp_active());
        assert!(materialize_all(&trace, TableView::Complete).unwrap().is_empty());
    }
}
