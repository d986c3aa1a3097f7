//! Document access contract. The editor/host side implements this; the crate
//! only needs "read a document" and "replace one range atomically".

use crate::ports::search::Range;
use async_trait::async_trait;
use std::io;

pub type Result<T> = std::result::Result<T, EditError>;

#[derive(Debug)]
pub enum EditError {
    Io(io::Error),
    /// The edit no longer fits the file's current content. Scoped to the one
    /// file/match it names; callers must not let it abort sibling edits.
    Conflict {
        uri: String,
        message: String,
    },
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::Io(e) => write!(f, "IO error: {}", e),
            EditError::Conflict { uri, message } => {
                write!(f, "Edit conflict in {}: {}", uri, message)
            }
        }
    }
}

impl std::error::Error for EditError {}

impl From<io::Error> for EditError {
    fn from(e: io::Error) -> Self {
        EditError::Io(e)
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn read_document(&self, uri: &str) -> Result<String>;
    async fn apply_edit(&self, uri: &str, range: Range, replacement: &str) -> Result<()>;
}
