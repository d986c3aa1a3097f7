//! Preview extraction: the before/inside/after chunks rendered around a match.
//!
//! Positions resolve through a [`LineIndex`] built once per document, so the
//! per-match cost is proportional to the context window, not the document.

use crate::ports::search::{Position, Range};

/// Whole lines of context kept on each side of the match.
const CONTEXT_LINES: usize = 1;
/// Upper bound per chunk; trimming keeps the side nearest the match.
const MAX_CHUNK_BYTES: usize = 256;

/// Byte offsets of line starts, computed in one pass over the document.
#[derive(Debug)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Start offset of `line`, clamped to the last line.
    pub fn line_start(&self, line: usize) -> usize {
        let line = line.min(self.line_starts.len() - 1);
        self.line_starts[line]
    }

    /// End offset of `line` (start of the next line, or document end).
    pub fn line_end(&self, line: usize) -> usize {
        let line = line.min(self.line_starts.len() - 1);
        self.line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.len)
    }

    /// Resolve a position to a byte offset, clamping out-of-range lines and
    /// columns. `text` must be the document the index was built from; the
    /// result is snapped back to a char boundary.
    pub fn offset(&self, text: &str, pos: Position) -> usize {
        let start = self.line_start(pos.line as usize);
        let end = self.line_end(pos.line as usize);
        let mut off = (start + pos.col as usize).min(end).min(self.len);
        while off > 0 && !text.is_char_boundary(off) {
            off -= 1;
        }
        off
    }

    /// Like [`offset`](Self::offset), but refuses positions that do not exist
    /// in the current content. Used when applying edits, where a clamped
    /// position would silently edit the wrong place.
    pub fn offset_strict(&self, text: &str, pos: Position) -> Option<usize> {
        let line = pos.line as usize;
        if line >= self.line_starts.len() {
            return None;
        }
        let off = self.line_starts[line] + pos.col as usize;
        if off > self.line_end(line) || !text.is_char_boundary(off) {
            return None;
        }
        Some(off)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewChunks {
    pub before: String,
    pub inside: String,
    pub after: String,
}

/// Extract the preview chunks around `range`. Pure and deterministic: the
/// same text and range always produce the same chunks, and bounds are clamped
/// to the document, never read past it.
pub fn extract_preview(text: &str, index: &LineIndex, range: Range) -> PreviewChunks {
    let start = index.offset(text, range.start);
    let end = index.offset(text, range.end).max(start);

    let before_from = index.line_start((range.start.line as usize).saturating_sub(CONTEXT_LINES));
    let after_to = index.line_end(range.end.line as usize + CONTEXT_LINES).max(end);

    PreviewChunks {
        before: tail_within(&text[before_from..start], MAX_CHUNK_BYTES),
        inside: text[start..end].to_string(),
        after: head_within(&text[end..after_to], MAX_CHUNK_BYTES),
    }
}

/// Last `max` bytes of `s`, trimmed forward to a char boundary.
fn tail_within(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = s.len() - max;
    while cut < s.len() && !s.is_char_boundary(cut) {
        cut += 1;
    }
    s[cut..].to_string()
}

/// First `max` bytes of `s`, trimmed back to a char boundary.
fn head_within(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while cut > 0 && !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s[..cut].to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/store/preview.rs"]
mod tests;
