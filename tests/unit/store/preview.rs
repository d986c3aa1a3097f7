use super::*;
use crate::ports::search::Position;

fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
    Range::new(Position::new(sl, sc), Position::new(el, ec))
}

const DOC: &str = "line one\nline two target line two tail\nline three\n";

#[test]
fn test_inside_is_exact_span() {
    let index = LineIndex::new(DOC);
    let chunks = extract_preview(DOC, &index, range(1, 9, 1, 15));
    assert_eq!(chunks.inside, "target");
    assert_eq!(chunks.before, "line one\nline two ");
    assert_eq!(chunks.after, " line two tail\nline three\n");
}

#[test]
fn test_deterministic() {
    let index = LineIndex::new(DOC);
    let a = extract_preview(DOC, &index, range(1, 9, 1, 15));
    let b = extract_preview(DOC, &index, range(1, 9, 1, 15));
    assert_eq!(a, b);
}

#[test]
fn test_truncated_at_document_start() {
    let text = "head tail";
    let index = LineIndex::new(text);
    let chunks = extract_preview(text, &index, range(0, 0, 0, 4));
    assert_eq!(chunks.before, "");
    assert_eq!(chunks.inside, "head");
    assert_eq!(chunks.after, " tail");
}

#[test]
fn test_truncated_at_document_end() {
    let text = "head tail";
    let index = LineIndex::new(text);
    let chunks = extract_preview(text, &index, range(0, 5, 0, 9));
    assert_eq!(chunks.inside, "tail");
    assert_eq!(chunks.after, "");
}

#[test]
fn test_out_of_range_positions_are_clamped() {
    let text = "only line";
    let index = LineIndex::new(text);
    let chunks = extract_preview(text, &index, range(7, 0, 7, 100));
    assert_eq!(chunks.inside, "only line");
    assert_eq!(chunks.after, "");
}

#[test]
fn test_multibyte_columns_snap_to_char_boundary() {
    let text = "héllo wörld";
    let index = LineIndex::new(text);
    // col 2 lands inside the two-byte 'é' and snaps back to its start
    let chunks = extract_preview(text, &index, range(0, 2, 0, 4));
    assert_eq!(chunks.inside, "él");
}

#[test]
fn test_long_context_is_capped_near_the_match() {
    let text = format!("{}match tail", "a".repeat(400));
    let index = LineIndex::new(&text);
    let chunks = extract_preview(&text, &index, range(0, 400, 0, 405));
    assert_eq!(chunks.inside, "match");
    assert_eq!(chunks.before.len(), 256);
    assert!(chunks.before.chars().all(|c| c == 'a'));
}

#[test]
fn test_empty_range() {
    let index = LineIndex::new(DOC);
    let chunks = extract_preview(DOC, &index, range(1, 9, 1, 9));
    assert_eq!(chunks.inside, "");
    assert_eq!(chunks.before, "line one\nline two ");
}
