//! Query compilation.
//!
//! Turns raw query text plus [`SearchOptions`] into a [`CompiledPattern`],
//! or rejects it when the normalized query is too short. Normalization is
//! a fixed pipeline and order matters:
//!
//! 1. Strip markup characters (`<>[]{}`) — never query content.
//! 2. Collapse the entry separators `::` and `|` to a space, so a query
//!    can span what would be separate sub-entries.
//! 3. Collapse whitespace runs to one space.
//! 4. Trim leading/trailing punctuation; a trailing run becomes a single
//!    space rather than vanishing.
//! 5. A single trailing space means "this word must end here": force the
//!    end boundary and drop the space.
//! 6. A leading `*` disables start anchoring (prefix wildcard).
//! 7. A trailing `*` disables end anchoring (suffix wildcard).
//! 8. Reject if the remaining text is shorter than `min`.
//! 9. Escape pattern metacharacters, then reinterpret escaped `*` as a
//!    run of non-whitespace characters — the only wildcard supported.
//! 10. Wrap with the boundary anchors selected by the options.
//!
//! The compiled pattern's capture spans anchor + body + boundary, so
//! [`CompiledPattern::first_match`] reports the anchor text (e.g. `"; to "`)
//! as part of the matched span. Both scoring and highlighting rely on that.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

use crate::model::types::SearchOptions;

/// Anchor matching the start of a semantic unit: string start, a
/// sub-entry or side separator, or `"; "`, optionally followed by the
/// translation-direction marker `"to "`.
const START_ANCHOR: &str = r"(?:^| \| | :: |; )(?:to )?";

const WORD_BOUNDARY: &str = r"\b";

static WS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));
static LEADING_TRIM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[ ,;:+']+").expect("static regex"));
static TRAILING_TRIM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ ,:;']+$").expect("static regex"));

/// Why a query failed to compile.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Normalized query length is below the `min` option. Callers surface
    /// this as "no search performed", distinct from zero results.
    #[error("query too short (minimum {min} characters)")]
    TooShort { min: usize },

    #[error("failed to compile search pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// A location where a pattern matched.
///
/// Offsets are byte positions into the tested text. `text` includes any
/// anchor characters the pattern consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan<'t> {
    pub index: usize,
    pub text: &'t str,
}

impl MatchSpan<'_> {
    pub fn end(&self) -> usize {
        self.index + self.text.len()
    }
}

/// A compiled query, opaque beyond `test` and `first_match`.
///
/// Only the first occurrence in a text is ever located; entries with a
/// better second occurrence are scored on their first. This is a known
/// simplification of the relevance model, kept deliberately.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    re: Regex,
}

impl CompiledPattern {
    pub fn test(&self, text: &str) -> bool {
        self.re.is_match(text)
    }

    /// First match only; `None` when the pattern does not occur.
    pub fn first_match<'t>(&self, text: &'t str) -> Option<MatchSpan<'t>> {
        self.re.find(text).map(|m| MatchSpan {
            index: m.start(),
            text: m.as_str(),
        })
    }
}

/// Compile `query` under `options`, or reject it as too short.
pub fn compile(query: &str, options: &SearchOptions) -> Result<CompiledPattern, QueryError> {
    let mut start = if options.start {
        START_ANCHOR
    } else {
        WORD_BOUNDARY
    };
    let mut end = if options.end { WORD_BOUNDARY } else { "" };

    let mut search: String = query
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '[' | ']' | '{' | '}'))
        .collect();
    search = search.replace("::", " ").replace('|', " ");
    search = WS_RUN.replace_all(&search, " ").into_owned();
    search = LEADING_TRIM.replace(&search, "").into_owned();
    search = TRAILING_TRIM.replace(&search, " ").into_owned();

    if search.ends_with(' ') {
        end = WORD_BOUNDARY;
        search.pop();
    }
    if let Some(rest) = search.strip_prefix('*') {
        start = "";
        search = rest.to_string();
    }
    if search.ends_with('*') {
        end = "";
        search.pop();
    }

    if search.chars().count() < options.min {
        return Err(QueryError::TooShort { min: options.min });
    }

    let body = escape_body(&search).replace("\\*", r"\S*");
    let re = RegexBuilder::new(&format!("({start}{body}{end})"))
        .case_insensitive(options.ignore_case)
        .build()?;
    Ok(CompiledPattern { re })
}

/// Backslash-escape every pattern metacharacter in the query body.
///
/// Deliberately local rather than [`regex::escape`]: the escape set must
/// stay in lockstep with the `\*` rewrite above, which has to target
/// exactly the asterisks this function escaped.
fn escape_body(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if matches!(
            c,
            '\\' | '{' | '}' | '(' | ')' | '|' | '.' | '?' | '*' | '+' | '-' | '^' | '$' | '['
                | ']'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
