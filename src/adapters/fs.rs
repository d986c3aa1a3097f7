//! Filesystem-backed document store.

use crate::ports::editor::{DocumentStore, EditError, Result};
use crate::ports::search::Range;
use crate::store::LineIndex;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct FsDocumentStore;

impl FsDocumentStore {
    pub fn new() -> Self {
        Self
    }

    fn resolve(uri: &str) -> PathBuf {
        Path::new(uri.strip_prefix("file://").unwrap_or(uri)).to_path_buf()
    }
}

impl Default for FsDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn read_document(&self, uri: &str) -> Result<String> {
        Ok(tokio::fs::read_to_string(Self::resolve(uri)).await?)
    }

    /// Replace `range` with `replacement`, atomically per file: the new
    /// content is written to a sibling temp file and renamed over the
    /// original. A range that does not resolve against the current content
    /// is a conflict, not a clamped edit.
    async fn apply_edit(&self, uri: &str, range: Range, replacement: &str) -> Result<()> {
        let path = Self::resolve(uri);
        let text = tokio::fs::read_to_string(&path).await?;

        let index = LineIndex::new(&text);
        let conflict = |message: &str| EditError::Conflict {
            uri: uri.to_string(),
            message: message.to_string(),
        };
        let start = index
            .offset_strict(&text, range.start)
            .ok_or_else(|| conflict("start position out of range"))?;
        let end = index
            .offset_strict(&text, range.end)
            .ok_or_else(|| conflict("end position out of range"))?;
        if start > end {
            return Err(conflict("inverted range"));
        }

        let mut edited = String::with_capacity(text.len() + replacement.len());
        edited.push_str(&text[..start]);
        edited.push_str(replacement);
        edited.push_str(&text[end..]);

        // Append to the full file name so `a.py` and `a.rs` in the same
        // directory never share a temp path.
        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".searchlink.tmp");
        let tmp = path.with_file_name(tmp_name);
        tokio::fs::write(&tmp, edited).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/adapters/fs.rs"]
mod tests;
