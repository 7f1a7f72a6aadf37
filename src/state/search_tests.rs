//! Tests for the search engine.

use super::*;
use crate::sink::escape_markup;

// ===== Test Helpers =====

fn buffer_of(lines: &[&str]) -> ContentBuffer {
    let mut buffer = ContentBuffer::new();
    buffer.append_chunk(&lines.join("\n"));
    buffer
}

fn positions(engine: &SearchEngine) -> Vec<(usize, usize)> {
    engine.matches().iter().map(|m| (m.line, m.offset)).collect()
}

// ===== SearchQuery =====

#[test]
fn query_rejects_only_empty_string() {
    assert!(SearchQuery::new("").is_none());
    assert_eq!(SearchQuery::new(" ").map(|q| q.as_str().to_string()), Some(" ".to_string()));
    assert_eq!(SearchQuery::new("err").unwrap().as_str(), "err");
}

// ===== set_query =====

#[test]
fn finds_matches_case_insensitively() {
    let buffer = buffer_of(&["error: disk full", "ok", "ERROR: disk ok"]);
    let mut engine = SearchEngine::new();

    engine.set_query("error", &buffer);

    assert_eq!(positions(&engine), vec![(0, 0), (2, 0)]);
    assert_eq!(engine.current_index(), Some(0));
}

#[test]
fn finds_multiple_matches_per_line_left_to_right() {
    let buffer = buffer_of(&["a-b-a-b-a"]);
    let mut engine = SearchEngine::new();

    engine.set_query("a", &buffer);

    assert_eq!(positions(&engine), vec![(0, 0), (0, 4), (0, 8)]);
}

#[test]
fn scan_is_non_overlapping() {
    let buffer = buffer_of(&["aaaa", "aaa"]);
    let mut engine = SearchEngine::new();

    engine.set_query("aa", &buffer);

    assert_eq!(positions(&engine), vec![(0, 0), (0, 2), (1, 0)]);
}

#[test]
fn empty_query_clears_search() {
    let buffer = buffer_of(&["error"]);
    let mut engine = SearchEngine::new();
    engine.set_query("error", &buffer);

    engine.set_query("", &buffer);

    assert!(!engine.is_active());
    assert!(engine.matches().is_empty());
    assert_eq!(engine.current_index(), None);
    assert_eq!(engine.query(), "");
}

#[test]
fn set_query_is_idempotent() {
    let buffer = buffer_of(&["warn x", "WARN y warn"]);
    let mut engine = SearchEngine::new();

    engine.set_query("warn", &buffer);
    let first = engine.matches().to_vec();
    engine.set_query("warn", &buffer);

    assert_eq!(engine.matches(), first.as_slice());
}

#[test]
fn set_query_resets_current_index() {
    let buffer = buffer_of(&["x x x"]);
    let mut engine = SearchEngine::new();
    engine.set_query("x", &buffer);
    engine.next();
    engine.next();

    engine.set_query("x", &buffer);

    assert_eq!(engine.current_index(), Some(0));
}

#[test]
fn offsets_are_in_characters() {
    let buffer = buffer_of(&["héllo wörld wörld"]);
    let mut engine = SearchEngine::new();

    engine.set_query("WÖRLD", &buffer);

    assert_eq!(positions(&engine), vec![(0, 6), (0, 12)]);
    let m = &engine.matches()[0];
    assert_eq!(&buffer.get(0).unwrap()[m.byte_range.clone()], "wörld");
}

#[test]
fn query_with_regex_metacharacters_matches_literally() {
    let buffer = buffer_of(&["cost: $5.00 (approx)", "cost: 5500"]);
    let mut engine = SearchEngine::new();

    engine.set_query("$5.00 (", &buffer);

    assert_eq!(positions(&engine), vec![(0, 6)]);
}

#[test]
fn query_with_markup_characters_matches_raw_text() {
    let buffer = buffer_of(&["if a<b && c>d"]);
    let mut engine = SearchEngine::new();

    engine.set_query("a<b &&", &buffer);

    assert_eq!(positions(&engine), vec![(0, 3)]);
}

#[test]
fn expanding_lowercase_maps_back_to_whole_chars() {
    // 'İ' lowercases to "i\u{307}" (two chars).
    let buffer = buffer_of(&["İstanbul"]);
    let mut engine = SearchEngine::new();

    engine.set_query("i", &buffer);

    assert_eq!(engine.matches().len(), 1);
    let m = &engine.matches()[0];
    assert_eq!(m.offset, 0);
    assert_eq!(&buffer.get(0).unwrap()[m.byte_range.clone()], "İ");
}

// ===== navigation =====

#[test]
fn next_wraps_from_last_to_first() {
    let buffer = buffer_of(&["a", "a", "a"]);
    let mut engine = SearchEngine::new();
    engine.set_query("a", &buffer);

    assert!(engine.next());
    assert!(engine.next());
    assert_eq!(engine.current_index(), Some(2));
    assert!(engine.next());
    assert_eq!(engine.current_index(), Some(0));
}

#[test]
fn previous_wraps_from_first_to_last() {
    let buffer = buffer_of(&["a", "a", "a"]);
    let mut engine = SearchEngine::new();
    engine.set_query("a", &buffer);

    assert!(engine.previous());
    assert_eq!(engine.current_index(), Some(2));
}

#[test]
fn navigation_on_empty_match_set_is_noop() {
    let buffer = buffer_of(&["nothing here"]);
    let mut engine = SearchEngine::new();

    assert!(!engine.next(), "inactive search");
    assert!(!engine.previous());

    engine.set_query("zzz", &buffer);
    assert!(!engine.next(), "active search, no matches");
    assert!(!engine.previous());
    assert_eq!(engine.current_index(), None);
    assert!(engine.current_match().is_none());
}

// ===== invalidation =====

#[test]
fn buffer_growth_marks_matches_stale() {
    let mut buffer = buffer_of(&["error one"]);
    let mut engine = SearchEngine::new();
    engine.set_query("error", &buffer);
    assert!(!engine.is_stale(&buffer));

    buffer.append_chunk("error two");

    assert!(engine.is_stale(&buffer));
    engine.resync(&buffer);
    assert!(!engine.is_stale(&buffer));
    assert_eq!(positions(&engine), vec![(0, 0), (1, 0)]);
}

#[test]
fn highlight_resyncs_stale_matches() {
    let mut buffer = buffer_of(&["error one"]);
    let mut engine = SearchEngine::new();
    engine.set_query("error", &buffer);
    buffer.append_chunk("error two");

    let text = engine.highlight(&buffer);

    assert_eq!(text.marker_count(), 2);
    assert_eq!(engine.matches().len(), 2);
}

#[test]
fn inactive_search_is_never_stale() {
    let mut buffer = ContentBuffer::new();
    let engine = SearchEngine::new();
    buffer.append_chunk("x");
    assert!(!engine.is_stale(&buffer));
}

// ===== highlight_render =====

#[test]
fn empty_query_render_equals_escaped_plain_text() {
    let buffer = buffer_of(&["<b>bold</b> & co", "plain"]);
    let mut engine = SearchEngine::new();

    assert_eq!(
        engine.highlight_render(&buffer),
        escape_markup(&buffer.joined())
    );
}

#[test]
fn render_marks_current_and_other_matches() {
    let buffer = buffer_of(&["Error <x>", "error"]);
    let mut engine = SearchEngine::new();
    engine.set_query("error", &buffer);

    assert_eq!(
        engine.highlight_render(&buffer),
        "<span class=\"match current\">Error</span> &lt;x&gt;\n<span class=\"match\">error</span>"
    );

    engine.next();
    assert_eq!(
        engine.highlight_render(&buffer),
        "<span class=\"match\">Error</span> &lt;x&gt;\n<span class=\"match current\">error</span>"
    );
}

#[test]
fn nth_marker_is_nth_match() {
    let buffer = buffer_of(&["ab ab", "x", "AB"]);
    let mut engine = SearchEngine::new();
    engine.set_query("ab", &buffer);

    for expected in 0..3 {
        let text = engine.highlight(&buffer);
        let kinds: Vec<SegmentKind> = text
            .lines()
            .iter()
            .flat_map(|line| line.iter())
            .filter(|s| s.is_marker())
            .map(|s| s.kind)
            .collect();

        assert_eq!(kinds.len(), 3);
        for (i, kind) in kinds.iter().enumerate() {
            let want = if i == expected {
                SegmentKind::CurrentMatch
            } else {
                SegmentKind::Match
            };
            assert_eq!(*kind, want, "marker {i} with current {expected}");
        }
        engine.next();
    }
}

#[test]
fn highlight_preserves_original_case_in_markers() {
    let buffer = buffer_of(&["WARN: Warn"]);
    let mut engine = SearchEngine::new();
    engine.set_query("warn", &buffer);

    let text = engine.highlight(&buffer);
    let markers: Vec<&str> = text.lines()[0]
        .iter()
        .filter(|s| s.is_marker())
        .map(|s| s.text.as_str())
        .collect();

    assert_eq!(markers, vec!["WARN", "Warn"]);
}

#[test]
fn render_escapes_inside_markers() {
    let buffer = buffer_of(&["a<b"]);
    let mut engine = SearchEngine::new();
    engine.set_query("<", &buffer);

    assert_eq!(
        engine.highlight_render(&buffer),
        "a<span class=\"match current\">&lt;</span>b"
    );
}
