//! Applying suggested fixes to documents, one match or all of them.

use crate::ports::editor::{DocumentStore, EditError, Result};
use crate::ports::search::Range;
use crate::store::ResultStore;
use std::sync::{Arc, Mutex};

/// Outcome of one file's fix pass.
#[derive(Debug, Clone)]
pub struct FileFixReport {
    pub uri: String,
    pub applied: usize,
    pub failed: usize,
    pub error: Option<String>,
}

pub struct FixApplicator<D> {
    docs: Arc<D>,
}

impl<D: DocumentStore> FixApplicator<D> {
    pub fn new(docs: Arc<D>) -> Self {
        Self { docs }
    }

    /// Apply the fix of a single eligible match and mark it fixed. A missing
    /// or already-flagged match returns `Ok(false)`: stale references are an
    /// expected consequence of supersession, not an error. An edit failure
    /// leaves the flags untouched.
    pub async fn apply_single(
        &self,
        store: &Arc<Mutex<ResultStore>>,
        uri: &str,
        range: Range,
    ) -> Result<bool> {
        let Some(fix) = store
            .lock()
            .expect("result store poisoned")
            .eligible_fix(uri, range)
        else {
            return Ok(false);
        };

        self.docs.apply_edit(uri, range, &fix).await?;
        store
            .lock()
            .expect("result store poisoned")
            .mark_fixed(uri, range);
        Ok(true)
    }

    /// Apply every eligible fix, grouped per file. Each file's edits come
    /// from one consistent store snapshot and are applied in descending range
    /// order, so earlier edits cannot shift the ranges still pending. A
    /// failure stops the rest of that file (its snapshot is now stale) but
    /// never the other files.
    pub async fn apply_all(&self, store: &Arc<Mutex<ResultStore>>) -> Vec<FileFixReport> {
        let per_file = store
            .lock()
            .expect("result store poisoned")
            .eligible_fixes();

        let mut reports = Vec::with_capacity(per_file.len());
        for file in per_file {
            let mut applied: Vec<Range> = Vec::new();
            let mut error: Option<EditError> = None;

            for (range, fix) in &file.edits {
                match self.docs.apply_edit(&file.uri, *range, fix).await {
                    Ok(()) => applied.push(*range),
                    Err(e) => {
                        tracing::warn!(uri = %file.uri, error = %e, "fix application failed");
                        error = Some(e);
                        break;
                    }
                }
            }

            {
                let mut store = store.lock().expect("result store poisoned");
                for range in &applied {
                    store.mark_fixed(&file.uri, *range);
                }
            }

            reports.push(FileFixReport {
                uri: file.uri,
                failed: file.edits.len() - applied.len(),
                applied: applied.len(),
                error: error.map(|e| e.to_string()),
            });
        }
        reports
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fixes/applicator.rs"]
mod tests;
