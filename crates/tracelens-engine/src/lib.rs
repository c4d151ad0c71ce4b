// Engine module - pure trace reconstruction (store, tables, call tree, views)
// Everything here is a pure function of an immutable Trace; the mutable
// cursor lives in the runtime layer.

pub mod calltree;
pub mod error;
pub mod store;
pub mod summary;
pub mod tables;
pub mod views;

pub use calltree::{CallNode, CallTree, PreOrder};
pub use error::{Error, Result};
pub use store::{TableDefinition, Trace};
pub use summary::{TraceSummary, summarize};
pub use tables::{TableSnapshot, TableView, materialize, materialize_all};
pub use views::{StepEvent, line_for_step, output, step_event_at, variables_at};
