use crate::error::Result;
use tracelens_types::DebugResponse;

/// One debug request submitted to the analysis backend: the source code to
/// trace and optional test input fed to its stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugRequest {
    pub code: String,
    pub input: Option<String>,
}

impl DebugRequest {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            input: None,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }
}

/// The analysis/execution backend boundary. Implementations wrap whatever
/// transport actually delivers the trace; fetching is the single suspension
/// point of the core.
#[allow(async_fn_in_trait)]
pub trait TraceSource {
    async fn fetch(&self, request: &DebugRequest) -> Result<DebugResponse>;
}

/// Identity of one issued debug request. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestId(u64);

/// Tracks which request is allowed to install its response.
///
/// Only the most recently issued request is current; a stale, slower
/// response arriving after a newer request was issued must be discarded, so
/// the newest trace is the only one that can ever be installed.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new request identity, superseding all earlier ones.
    pub fn issue(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }
}
