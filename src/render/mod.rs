//! Entry formatting: from a raw glossary line to display sub-lines.
//!
//! Parses the `side0 :: side1` grammar into aligned sub-line records,
//! decides which sub-lines survive when the line is collapsed, assigns
//! roles, and overlays highlight marks. The output is a structured record
//! sequence; actual presentation lives in [`html`] and [`term`].
//!
//! Collapse rule: when the *first* pair already satisfies the pattern the
//! line is closed by default and keeps every sub-line. When it does not,
//! the line opens by default and sub-lines are filtered down to index 0
//! (kept as context) plus every pair where either side matches.

pub mod html;
pub mod term;

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::model::types::Entry;
use crate::search::pattern::CompiledPattern;

/// Inline markup spans: `<...>` annotations (empty allowed), `[...]` and
/// `{...}` optional content. Everything else is plain text.
static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^<>]*>|\[[^\[\]]+\]|\{[^{}]+\}").expect("static regex"));

/// Position of a sub-line within its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Sole surviving sub-line.
    Only,
    /// First of several sub-lines; toggles the rest.
    Main,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    Plain,
    /// `<...>` span, rendered smaller, brackets included in `text`.
    Annotation,
    /// `[...]` or `{...}` span, rendered emphasized.
    Optional,
}

/// One styled run of text within a sub-line side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Span {
    pub text: String,
    pub kind: SpanKind,
    /// Inside the pattern's matched range (the highlight overlay).
    pub marked: bool,
}

/// One display sub-line: aligned side texts, role, and whether the line
/// group renders expanded by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubLine {
    pub side0: Vec<Span>,
    pub side1: Vec<Span>,
    pub role: Role,
    pub expanded: bool,
}

/// Format one entry into its display sub-lines.
///
/// Pure and deterministic: the same entry and pattern always produce the
/// same records.
pub fn format_line(entry: &Entry, pattern: &CompiledPattern) -> Vec<SubLine> {
    let pairs = entry.sub_pairs();
    if pairs.is_empty() {
        return Vec::new();
    }

    let first_matches = pattern.test(pairs[0].0) || pattern.test(pairs[0].1);
    let open = !first_matches;
    let kept: Vec<(&str, &str)> = if open {
        pairs
            .into_iter()
            .enumerate()
            .filter(|(i, (a, b))| *i == 0 || pattern.test(a) || pattern.test(b))
            .map(|(_, pair)| pair)
            .collect()
    } else {
        pairs
    };

    let count = kept.len();
    kept.into_iter()
        .enumerate()
        .map(|(i, (side0, side1))| {
            let role = match i {
                0 if count == 1 => Role::Only,
                0 => Role::Main,
                _ => Role::Sub,
            };
            SubLine {
                side0: segment(side0, pattern),
                side1: segment(side1, pattern),
                role,
                expanded: open,
            }
        })
        .collect()
}

/// Split one side text into styled spans, then overlay the highlight.
///
/// Highlighting is applied last so it composes with the markup spans: the
/// matched range simply splits whatever spans it crosses. Only the first
/// match per side is marked.
fn segment(text: &str, pattern: &CompiledPattern) -> Vec<Span> {
    let mark = pattern.first_match(text).map(|m| m.index..m.end());
    let mut spans = Vec::new();
    let mut pos = 0;
    for m in MARKUP.find_iter(text) {
        push_split(&mut spans, text, pos..m.start(), SpanKind::Plain, &mark);
        let kind = if m.as_str().starts_with('<') {
            SpanKind::Annotation
        } else {
            SpanKind::Optional
        };
        push_split(&mut spans, text, m.range(), kind, &mark);
        pos = m.end();
    }
    push_split(&mut spans, text, pos..text.len(), SpanKind::Plain, &mark);
    spans
}

/// Push `range` of `text` as spans of `kind`, split at the boundaries of
/// the marked range when they intersect.
fn push_split(
    spans: &mut Vec<Span>,
    text: &str,
    range: Range<usize>,
    kind: SpanKind,
    mark: &Option<Range<usize>>,
) {
    if range.is_empty() {
        return;
    }
    match mark {
        Some(m) if m.start < range.end && m.end > range.start => {
            let a = range.start.max(m.start);
            let b = range.end.min(m.end);
            push(spans, &text[range.start..a], kind, false);
            push(spans, &text[a..b], kind, true);
            push(spans, &text[b..range.end], kind, false);
        }
        _ => push(spans, &text[range], kind, false),
    }
}

fn push(spans: &mut Vec<Span>, text: &str, kind: SpanKind, marked: bool) {
    if !text.is_empty() {
        spans.push(Span {
            text: text.to_string(),
            kind,
            marked,
        });
    }
}
