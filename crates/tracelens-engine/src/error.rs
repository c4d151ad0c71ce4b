use std::fmt;

/// Result type for tracelens-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
#[derive(Debug)]
pub enum Error {
    /// A structural invariant of the trace was violated on load; no partial
    /// trace survives
    MalformedTrace { reason: String },

    /// Direct step access outside `[0, step_count)`; surfaced rather than
    /// clamped, unlike cursor navigation
    IndexOutOfRange { index: usize, len: usize },

    /// A call record's parent does not resolve to an earlier record
    OrphanCall { id: String, parent_id: String },

    /// A call's step range escapes its parent's range
    CallRangeEscapesParent { id: String },

    /// A table name that no declared definition matches
    UnknownTable(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MalformedTrace { reason } => write!(f, "malformed trace: {}", reason),
            Error::IndexOutOfRange { index, len } => {
                write!(f, "step index {} out of range (trace has {} steps)", index, len)
            }
            Error::OrphanCall { id, parent_id } => {
                write!(f, "call {} references unknown parent {}", id, parent_id)
            }
            Error::CallRangeEscapesParent { id } => {
                write!(f, "call {} spans steps outside its parent's range", id)
            }
            Error::UnknownTable(name) => write!(f, "unknown table: {}", name),
        }
    }
}

impl std::error::Error for Error {}
