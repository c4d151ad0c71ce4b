use crate::error::{Error, Result};
use serde_json::Value;
use tracelens_types::{CallRecord, DebugReport, Step, TableKind, TableUpdateEvent};

/// A declared DP table with its name resolved from the wire map key.
#[derive(Debug, Clone)]
pub struct TableDefinition {
    pub name: String,
    pub kind: TableKind,
    pub dimensions: Vec<usize>,
    /// Contents before any update event applies
    pub initial_value: Value,
    /// Backend-supplied terminal state, if declared
    pub final_value: Option<Value>,
}

/// The immutable trace aggregate: ordered steps, flat pre-order call
/// hierarchy, table definitions, and the table mutation log.
///
/// Constructed atomically from one backend report and never mutated
/// afterwards; navigation state lives elsewhere.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    steps: Vec<Step>,
    calls: Vec<CallRecord>,
    tables: Vec<TableDefinition>,
    updates: Vec<TableUpdateEvent>,
    dp_active: bool,
}

impl Trace {
    /// Validate a backend report and build the trace.
    ///
    /// Checked invariants: step indices are dense `[0, N)` (missing indices
    /// are filled from position, explicit ones must match), call step ranges
    /// are ordered and in bounds, and every update event references a
    /// declared table at an in-range step. Parent resolution inside the call
    /// hierarchy is deliberately left to [`crate::CallTree::build`] so a
    /// broken hierarchy degrades only the tree view.
    pub fn from_report(report: DebugReport) -> Result<Self> {
        let DebugReport {
            debug_states: mut steps,
            call_hierarchy: calls,
            dp_visualization,
            dp_tables,
            dp_updates: updates,
            ..
        } = report;

        for (position, step) in steps.iter_mut().enumerate() {
            match step.index {
                None => step.index = Some(position),
                Some(index) if index == position => {}
                Some(index) => {
                    return Err(Error::MalformedTrace {
                        reason: format!(
                            "step at position {} carries index {}, breaking the dense ordering",
                            position, index
                        ),
                    });
                }
            }
        }
        let step_count = steps.len();

        for call in &calls {
            if call.start_step > call.end_step {
                return Err(Error::MalformedTrace {
                    reason: format!(
                        "call {} starts at step {} but ends at step {}",
                        call.id, call.start_step, call.end_step
                    ),
                });
            }
            if call.end_step >= step_count {
                return Err(Error::MalformedTrace {
                    reason: format!(
                        "call {} ends at step {} but the trace has {} steps",
                        call.id, call.end_step, step_count
                    ),
                });
            }
        }

        let mut tables = Vec::new();
        if let Some(specs) = dp_tables {
            for (name, spec) in specs {
                let initial_value = if spec.initial_value.is_null() {
                    spec.kind.empty_value()
                } else {
                    spec.initial_value
                };
                tables.push(TableDefinition {
                    name,
                    kind: spec.kind,
                    dimensions: spec.dimensions,
                    initial_value,
                    final_value: spec.final_value,
                });
            }
        }

        for update in &updates {
            if !tables.iter().any(|t| t.name == update.table_name) {
                return Err(Error::MalformedTrace {
                    reason: format!(
                        "update at step {} references undeclared table \"{}\"",
                        update.step_index, update.table_name
                    ),
                });
            }
            if update.step_index >= step_count {
                return Err(Error::MalformedTrace {
                    reason: format!(
                        "update for table \"{}\" at step {} exceeds the last step {}",
                        update.table_name,
                        update.step_index,
                        step_count.saturating_sub(1)
                    ),
                });
            }
        }

        let dp_active = dp_visualization || !tables.is_empty();

        Ok(Self {
            steps,
            calls,
            tables,
            updates,
            dp_active,
        })
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Direct step access; fails rather than clamps.
    pub fn step_at(&self, index: usize) -> Result<&Step> {
        self.steps.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn call_records(&self) -> &[CallRecord] {
        &self.calls
    }

    pub fn table_definitions(&self) -> &[TableDefinition] {
        &self.tables
    }

    pub fn table_definition(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Mutation log in emission order; log order is the tie-break for events
    /// sharing a step index.
    pub fn table_updates(&self) -> &[TableUpdateEvent] {
        &self.updates
    }

    /// Whether the table-reconstruction path applies to this trace.
    pub fn is_dp_active(&self) -> bool {
        self.dp_active
    }
}
