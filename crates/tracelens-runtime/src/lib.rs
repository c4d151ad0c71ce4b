// Runtime module - the mutable shell around the pure engine
// Owns the one mutable entity of the core (the timeline cursor) plus trace
// installation with latest-request-wins ordering.

pub mod client;
pub mod cursor;
pub mod error;
pub mod session;

pub use client::{DebugRequest, RequestId, RequestTracker, TraceSource};
pub use cursor::TimelineCursor;
pub use error::{Error, Result};
pub use session::{DebugSession, InstallOutcome, TableMode};
