use crate::client::{DebugRequest, RequestId, RequestTracker, TraceSource};
use crate::cursor::TimelineCursor;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use tracelens_engine::{CallTree, TableSnapshot, TableView, Trace, TraceSummary};
use tracelens_types::{Complexity, DebugResponse, Step};

/// Which point in time [`DebugSession::materialize_table`] should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    /// The table as of the current cursor position
    Stepwise,
    /// The backend-declared end state, independent of the cursor
    Complete,
}

/// Outcome of installing a fetched response into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    /// A newer request was issued while this response was in flight
    Discarded,
}

#[derive(Debug)]
struct LoadedTrace {
    trace: Trace,
    complexity: Option<Complexity>,
    installed_at: DateTime<Utc>,
}

/// One debugging session: the installed trace plus the timeline cursor.
///
/// The trace is immutable once installed and the cursor is the only mutable
/// entity; every view below is recomputed from `(trace, position)` on each
/// read, so no derived value survives a cursor move. A failed install leaves
/// the previously loaded trace and cursor completely unchanged.
#[derive(Debug, Default)]
pub struct DebugSession {
    loaded: Option<LoadedTrace>,
    cursor: TimelineCursor,
    requests: RequestTracker,
}

impl DebugSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_trace(&self) -> bool {
        self.loaded.is_some()
    }

    pub fn trace(&self) -> Option<&Trace> {
        self.loaded.as_ref().map(|loaded| &loaded.trace)
    }

    pub fn installed_at(&self) -> Option<DateTime<Utc>> {
        self.loaded.as_ref().map(|loaded| loaded.installed_at)
    }

    /// Backend complexity metadata for the installed trace.
    pub fn complexity(&self) -> Option<&Complexity> {
        self.loaded.as_ref()?.complexity.as_ref()
    }

    /// Validate a backend response and make it the session's trace, resetting
    /// the cursor to step 0.
    ///
    /// Fails with [`Error::Backend`] when the backend reported failure and
    /// with [`Error::Engine`] when the trace is malformed; in both cases the
    /// prior trace, if any, remains active.
    pub fn install(&mut self, response: DebugResponse) -> Result<()> {
        if !response.success {
            return Err(Error::Backend {
                message: response.error,
            });
        }
        let mut report = response.debug_states.ok_or(Error::Backend {
            message: Some("response carried no debug states".to_string()),
        })?;

        let complexity = response.complexity.or_else(|| report.complexity.take());
        let trace = Trace::from_report(report)?;

        self.cursor = TimelineCursor::new(trace.step_count());
        self.loaded = Some(LoadedTrace {
            trace,
            complexity,
            installed_at: Utc::now(),
        });
        Ok(())
    }

    /// Parse and install a raw backend response body.
    pub fn install_json(&mut self, raw: &str) -> Result<()> {
        let response = DebugResponse::from_json(raw)?;
        self.install(response)
    }

    /// Issue the identity for a request about to be sent. Supersedes every
    /// earlier in-flight request.
    pub fn begin_request(&mut self) -> RequestId {
        self.requests.issue()
    }

    /// Install `response` only if `id` is still the newest issued request;
    /// a stale response is discarded without touching the session.
    pub fn try_install(&mut self, id: RequestId, response: DebugResponse) -> Result<InstallOutcome> {
        if !self.requests.is_current(id) {
            return Ok(InstallOutcome::Discarded);
        }
        self.install(response)?;
        Ok(InstallOutcome::Installed)
    }

    /// Fetch a trace from `source` and install it under the
    /// latest-request-wins rule. While the fetch is pending the previous
    /// trace and cursor stay untouched and usable.
    pub async fn submit(
        &mut self,
        source: &impl TraceSource,
        request: &DebugRequest,
    ) -> Result<InstallOutcome> {
        let id = self.begin_request();
        let response = source.fetch(request).await;
        if !self.requests.is_current(id) {
            return Ok(InstallOutcome::Discarded);
        }
        self.try_install(id, response?)
    }

    // --- navigation ---

    pub fn step_count(&self) -> usize {
        self.trace().map(Trace::step_count).unwrap_or(0)
    }

    /// Current cursor position; `None` when no trace is loaded or the trace
    /// is empty.
    pub fn position(&self) -> Option<usize> {
        self.cursor.position()
    }

    pub fn next(&mut self) -> bool {
        self.cursor.next()
    }

    pub fn prev(&mut self) -> bool {
        self.cursor.prev()
    }

    pub fn jump_to(&mut self, target: usize) -> bool {
        self.cursor.jump_to(target)
    }

    // --- views, recomputed on every read ---

    pub fn current_step(&self) -> Option<&Step> {
        let position = self.cursor.position()?;
        self.trace()?.steps().get(position)
    }

    pub fn current_line(&self) -> Option<u32> {
        self.current_step()?.line
    }

    pub fn line_for_step(&self, position: usize) -> Option<u32> {
        tracelens_engine::line_for_step(self.trace()?, position)
    }

    /// Variable bindings at `position`; empty for out-of-range positions or
    /// when no trace is loaded.
    pub fn variables_for_step(&self, position: usize) -> BTreeMap<String, Value> {
        self.trace()
            .map(|trace| tracelens_engine::variables_at(trace, position))
            .unwrap_or_default()
    }

    pub fn current_variables(&self) -> BTreeMap<String, Value> {
        self.cursor
            .position()
            .map(|position| self.variables_for_step(position))
            .unwrap_or_default()
    }

    /// Rebuild the call tree from the installed trace. A malformed hierarchy
    /// fails here without affecting the timeline or variable views.
    pub fn call_tree(&self) -> Result<CallTree> {
        let trace = self.trace().ok_or(Error::NoTrace)?;
        Ok(CallTree::build(trace.call_records())?)
    }

    /// Materialize one declared table, stepwise against the cursor or in its
    /// complete end state.
    pub fn materialize_table(&self, name: &str, mode: TableMode) -> Result<TableSnapshot> {
        let trace = self.trace().ok_or(Error::NoTrace)?;
        let view = match mode {
            TableMode::Stepwise => TableView::Stepwise(self.cursor.position().unwrap_or(0)),
            TableMode::Complete => TableView::Complete,
        };
        Ok(tracelens_engine::materialize(trace, name, view)?)
    }

    /// All declared tables at once, same modes as
    /// [`DebugSession::materialize_table`].
    pub fn materialize_tables(&self, mode: TableMode) -> Result<Vec<TableSnapshot>> {
        let trace = self.trace().ok_or(Error::NoTrace)?;
        let view = match mode {
            TableMode::Stepwise => TableView::Stepwise(self.cursor.position().unwrap_or(0)),
            TableMode::Complete => TableView::Complete,
        };
        Ok(tracelens_engine::materialize_all(trace, view)?)
    }

    /// Whether the table-reconstruction path applies; callers check this
    /// before asking for tables.
    pub fn is_dp_active(&self) -> bool {
        self.trace().is_some_and(Trace::is_dp_active)
    }

    pub fn summary(&self) -> Option<TraceSummary> {
        self.trace().map(tracelens_engine::summarize)
    }

    /// Captured stdout of the traced program.
    pub fn output(&self) -> Option<&str> {
        tracelens_engine::output(self.trace()?)
    }
}
