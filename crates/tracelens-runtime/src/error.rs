use std::fmt;

/// Result type for tracelens-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Engine layer error (malformed trace, orphan call, ...)
    Engine(tracelens_engine::Error),

    /// Types layer error (unparseable response body)
    Parse(tracelens_types::Error),

    /// The backend reported failure, or the transport did; prior session
    /// state stays untouched
    Backend { message: Option<String> },

    /// An operation that needs an installed trace was called without one
    NoTrace,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Engine(err) => write!(f, "engine error: {}", err),
            Error::Parse(err) => write!(f, "parse error: {}", err),
            Error::Backend { message } => match message {
                Some(message) => write!(f, "debugging failed: {}", message),
                None => write!(f, "debugging failed: backend reported failure"),
            },
            Error::NoTrace => write!(f, "no trace is loaded"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Engine(err) => Some(err),
            Error::Parse(err) => Some(err),
            Error::Backend { .. } | Error::NoTrace => None,
        }
    }
}

impl From<tracelens_engine::Error> for Error {
    fn from(err: tracelens_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<tracelens_types::Error> for Error {
    fn from(err: tracelens_types::Error) -> Self {
        Error::Parse(err)
    }
}
