//! ANSI terminal rendering of ranked results.

use colored::Colorize;

use crate::render::{format_line, Role, Span, SpanKind, SubLine};
use crate::search::rank::RankedResult;

/// Render a ranked result for the terminal, one sub-line per row.
pub fn render_results(ranked: &RankedResult<'_>) -> String {
    let mut out = String::new();
    for entry in &ranked.entries {
        for line in format_line(entry, &ranked.pattern) {
            out.push_str(&render_sub_line(&line));
            out.push('\n');
        }
    }
    if out.is_empty() {
        return format!("{}\n", "No result".dimmed());
    }
    if ranked.truncated {
        out.push_str(&format!("{}\n", "More results available".dimmed()));
    }
    out
}

pub fn render_sub_line(line: &SubLine) -> String {
    let indent = match line.role {
        Role::Sub => "    ",
        Role::Only | Role::Main => "",
    };
    let row = format!(
        "{indent}{}  ::  {}",
        render_spans(&line.side0),
        render_spans(&line.side1)
    );
    // Collapsed continuation lines are the ones a toggle would reveal.
    if line.role == Role::Sub && !line.expanded {
        row.dimmed().to_string()
    } else {
        row
    }
}

fn render_spans(spans: &[Span]) -> String {
    spans.iter().map(render_span).collect()
}

fn render_span(span: &Span) -> String {
    let styled = match span.kind {
        SpanKind::Plain => span.text.normal(),
        SpanKind::Annotation => span.text.dimmed(),
        SpanKind::Optional => span.text.italic(),
    };
    if span.marked {
        styled.yellow().bold().to_string()
    } else {
        styled.to_string()
    }
}
