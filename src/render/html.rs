//! HTML table rendering of ranked results.
//!
//! Emits the markup the original web frontend consumes: a `<table>` of
//! `<tr>` sub-lines with `only-line` / `main-line` / `sub-line` roles and
//! `open` / `closed` collapse state, `<td lang="de">` / `<td lang="en">`
//! cells, `<small>` annotations, `<i>` optional spans and `<mark>`
//! highlights. Stylesheets written against that frontend keep working.

use crate::render::{format_line, Role, Span, SpanKind, SubLine};
use crate::search::rank::RankedResult;

/// Render a whole ranked result, including the empty and truncated states.
pub fn render_results(ranked: &RankedResult<'_>) -> String {
    let rows: String = ranked
        .entries
        .iter()
        .flat_map(|entry| format_line(entry, &ranked.pattern))
        .map(|line| render_sub_line(&line))
        .collect();
    if rows.is_empty() {
        return "<p>No result</p>".to_string();
    }
    let mut out = format!("<table>{rows}</table>");
    if ranked.truncated {
        out.push_str("<p>More results available</p>");
    }
    out
}

pub fn render_sub_line(line: &SubLine) -> String {
    let role = match line.role {
        Role::Only => "only-line",
        Role::Main => "main-line",
        Role::Sub => "sub-line",
    };
    let state = if line.expanded { "open" } else { "closed" };
    format!(
        "<tr class=\"{role} {state}\"><td lang=\"de\">{}</td><td lang=\"en\">{}</td></tr>",
        render_spans(&line.side0),
        render_spans(&line.side1),
    )
}

fn render_spans(spans: &[Span]) -> String {
    spans.iter().map(render_span).collect()
}

fn render_span(span: &Span) -> String {
    let escaped = escape(&span.text);
    let styled = match span.kind {
        SpanKind::Plain => escaped,
        SpanKind::Annotation => format!("<small>{escaped}</small>"),
        SpanKind::Optional => format!("<i>{escaped}</i>"),
    };
    if span.marked {
        format!("<mark>{styled}</mark>")
    } else {
        styled
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
