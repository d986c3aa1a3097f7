//! Search wire contracts shared between the session layer and the query server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Debug)]
pub enum SearchError {
    Transport(String),
    Protocol(String),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Transport(msg) => write!(f, "Transport error: {}", msg),
            SearchError::Protocol(msg) => write!(f, "Protocol error: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

static SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque per-search token. Allocated client-side, echoed to the server on
/// every request, and compared against the manager's active pointer to detect
/// supersession. Zero is reserved for "no active session".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(u64);

impl SessionId {
    pub fn next() -> Self {
        Self(SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A search request. Immutable once a session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub pattern: String,
    /// Suggested replacement template. `None` means search-only.
    pub fix: Option<String>,
    pub include_globs: Vec<String>,
    pub exclude_globs: Vec<String>,
    pub language: Option<String>,
}

impl Query {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            fix: None,
            include_globs: Vec::new(),
            exclude_globs: Vec::new(),
            language: None,
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// One match as reported by the server, in the coordinate space of the file's
/// content at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchLocation {
    pub uri: String,
    pub range: Range,
    pub suggested_fix: Option<String>,
}

/// One streamed batch. An empty `locations` sequence is the exhaustion signal;
/// the server sends it exactly once, at the end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Batch {
    pub locations: Vec<MatchLocation>,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Request/response seam to the query server. Ordered per session; the session
/// id travels on every call so the server never has to guess which search a
/// continuation poll belongs to.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn start_search(&self, session: SessionId, query: &Query) -> Result<Batch>;
    async fn poll_continuation(&self, session: SessionId) -> Result<Batch>;
}
