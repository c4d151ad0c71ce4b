pub mod call;
pub mod complexity;
pub mod error;
pub mod report;
pub mod step;
pub mod table;

pub use call::CallRecord;
pub use complexity::{Complexity, LoopInfo};
pub use error::{Error, Result};
pub use report::{DebugReport, DebugResponse};
pub use step::{Step, StepEventType};
pub use table::{TableKind, TableSpec, TableUpdateEvent};
