//! Accumulated results for one search session.
//!
//! A store belongs to exactly one session. Groups appear in first-seen file
//! order, matches in arrival order; the only mutations after a match is
//! visible are the fixed/dismissed flags, and nothing is appended once the
//! store concludes.

use crate::ports::search::{Range, SessionId};
use rustc_hash::FxHashMap;
use std::path::Path;

/// A match enriched with preview chunks and client-side flags.
#[derive(Debug, Clone)]
pub struct ViewMatch {
    pub uri: String,
    pub range: Range,
    pub suggested_fix: Option<String>,
    pub before: String,
    pub inside: String,
    pub after: String,
    pub is_fixed: bool,
    pub is_dismissed: bool,
}

impl ViewMatch {
    /// Fix present and neither terminal flag set.
    pub fn is_fix_eligible(&self) -> bool {
        self.suggested_fix.is_some() && !self.is_fixed && !self.is_dismissed
    }
}

/// All matches of one file, in arrival order.
#[derive(Debug, Clone)]
pub struct FileGroup {
    pub uri: String,
    /// Workspace-relative display path.
    pub path: String,
    pub matches: Vec<ViewMatch>,
}

/// Cumulative view projection. Fixed and dismissed matches are filtered out
/// of `files` but still counted, so the renderer can show summary totals.
#[derive(Debug, Clone)]
pub struct ViewResults {
    pub session_id: SessionId,
    pub concluded: bool,
    pub files: Vec<ViewFile>,
    pub total_matches: usize,
    pub visible_matches: usize,
    pub fixed_matches: usize,
    pub dismissed_matches: usize,
}

#[derive(Debug, Clone)]
pub struct ViewFile {
    pub uri: String,
    pub path: String,
    pub matches: Vec<ViewMatch>,
}

/// Eligible fixes of one file, ranges in descending order.
#[derive(Debug, Clone)]
pub struct FileFixes {
    pub uri: String,
    pub edits: Vec<(Range, String)>,
}

pub struct ResultStore {
    session_id: SessionId,
    groups: Vec<FileGroup>,
    index: FxHashMap<String, usize>,
    concluded: bool,
}

impl ResultStore {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            groups: Vec::new(),
            index: FxHashMap::default(),
            concluded: false,
        }
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn is_concluded(&self) -> bool {
        self.concluded
    }

    /// Append one batch worth of groups. Unseen files keep their first-seen
    /// order; known files get the new matches appended. Appends after
    /// conclusion are dropped.
    pub fn append_batch(&mut self, deltas: Vec<FileGroup>) {
        if self.concluded {
            tracing::warn!(
                session = %self.session_id,
                "dropping append on concluded store"
            );
            return;
        }
        for delta in deltas {
            match self.index.get(&delta.uri) {
                Some(&i) => self.groups[i].matches.extend(delta.matches),
                None => {
                    self.index.insert(delta.uri.clone(), self.groups.len());
                    self.groups.push(delta);
                }
            }
        }
    }

    /// Idempotent; returns true only on the first call.
    pub fn mark_concluded(&mut self) -> bool {
        !std::mem::replace(&mut self.concluded, true)
    }

    /// Flag the match at `(uri, range)` as fixed. Missing or already-flagged
    /// matches are a silent no-op (stale references are expected after
    /// supersession). Returns whether anything changed.
    pub fn mark_fixed(&mut self, uri: &str, range: Range) -> bool {
        self.flag(uri, range, |m| m.is_fixed = true)
    }

    /// Same contract as [`mark_fixed`](Self::mark_fixed), for dismissal.
    pub fn mark_dismissed(&mut self, uri: &str, range: Range) -> bool {
        self.flag(uri, range, |m| m.is_dismissed = true)
    }

    fn flag(&mut self, uri: &str, range: Range, set: impl FnOnce(&mut ViewMatch)) -> bool {
        let Some(&i) = self.index.get(uri) else {
            return false;
        };
        let Some(m) = self.groups[i]
            .matches
            .iter_mut()
            .find(|m| m.range == range)
        else {
            return false;
        };
        if m.is_fixed || m.is_dismissed {
            return false;
        }
        set(m);
        true
    }

    pub fn snapshot(&self) -> ViewResults {
        let mut total = 0;
        let mut fixed = 0;
        let mut dismissed = 0;
        let mut files = Vec::new();

        for group in &self.groups {
            total += group.matches.len();
            fixed += group.matches.iter().filter(|m| m.is_fixed).count();
            dismissed += group.matches.iter().filter(|m| m.is_dismissed).count();

            let visible: Vec<ViewMatch> = group
                .matches
                .iter()
                .filter(|m| !m.is_fixed && !m.is_dismissed)
                .cloned()
                .collect();
            if !visible.is_empty() {
                files.push(ViewFile {
                    uri: group.uri.clone(),
                    path: group.path.clone(),
                    matches: visible,
                });
            }
        }

        ViewResults {
            session_id: self.session_id,
            concluded: self.concluded,
            files,
            total_matches: total,
            visible_matches: total - fixed - dismissed,
            fixed_matches: fixed,
            dismissed_matches: dismissed,
        }
    }

    /// Eligible fixes grouped per file, in first-seen file order. Ranges are
    /// sorted descending within each file so a caller applying them in order
    /// cannot invalidate the ones still pending.
    pub fn eligible_fixes(&self) -> Vec<FileFixes> {
        self.groups
            .iter()
            .filter_map(|group| {
                let mut edits: Vec<(Range, String)> = group
                    .matches
                    .iter()
                    .filter(|m| m.is_fix_eligible())
                    .filter_map(|m| m.suggested_fix.clone().map(|fix| (m.range, fix)))
                    .collect();
                if edits.is_empty() {
                    return None;
                }
                edits.sort_by(|a, b| b.0.cmp(&a.0));
                Some(FileFixes {
                    uri: group.uri.clone(),
                    edits,
                })
            })
            .collect()
    }

    /// The suggested fix for one eligible match, if it exists.
    pub fn eligible_fix(&self, uri: &str, range: Range) -> Option<String> {
        let &i = self.index.get(uri)?;
        self.groups[i]
            .matches
            .iter()
            .find(|m| m.range == range && m.is_fix_eligible())
            .and_then(|m| m.suggested_fix.clone())
    }

    pub fn files_with_fixes(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| g.matches.iter().any(|m| m.is_fix_eligible()))
            .count()
    }
}

/// Workspace-relative display path for a file uri.
pub fn display_path(uri: &str, workspace_root: Option<&Path>) -> String {
    let path = uri.strip_prefix("file://").unwrap_or(uri);
    if let Some(root) = workspace_root {
        if let Ok(rel) = Path::new(path).strip_prefix(root) {
            return rel.to_string_lossy().into_owned();
        }
    }
    path.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/store/results.rs"]
mod tests;
