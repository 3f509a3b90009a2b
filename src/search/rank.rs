//! Filtering, scoring and ranking of corpus entries.
//!
//! The ranker is a pure function over (corpus, query, options): filter by
//! the compiled pattern, weight each match, stable-sort, truncate. Weights
//! reward matches that begin or end a semantic unit and matches on the
//! headword, so exact dictionary hits surface above mid-phrase ones.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::types::{Entry, SearchOptions, SIDE_SEPARATOR, SUB_SEPARATOR};
use crate::search::pattern::{self, CompiledPattern, QueryError};

/// `(...)`, `[...]`, `{...}` and `<...>` spans, stripped before scoring so
/// annotation content never inflates relevance.
static MARKUP_SPANS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^)]*\)|\[[^\]]*\]|\{[^}]*\}|<[^>]*>").expect("static regex")
});

static DOUBLE_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").expect("static regex"));

/// Separator token immediately before a match start.
static UNIT_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?: \| | :: |; )(?:to )?$").expect("static regex"));

/// Separator token immediately after a match end.
static UNIT_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?: \| | :: |; )").expect("static regex"));

/// Ranked output: entries in relevance order plus whether matches beyond
/// `max` were withheld. Carries the compiled pattern so the formatter can
/// highlight without recompiling.
#[derive(Debug)]
pub struct RankedResult<'c> {
    pub pattern: CompiledPattern,
    pub entries: Vec<&'c Entry>,
    pub truncated: bool,
}

/// Corpus filter predicate: does the pattern occur anywhere in the raw
/// entry text?
pub fn matches(entry: &Entry, pattern: &CompiledPattern) -> bool {
    pattern.test(entry.raw())
}

/// Relevance weight of an already-matched entry.
///
/// Scoring runs on the entry with all markup spans stripped; a match that
/// only existed inside stripped markup weighs 0. Otherwise:
///
/// - base 1
/// - +4 when the match starts the entry or follows a separator token
/// - +2 when the match ends the entry or precedes a separator token
/// - +1 when the pattern also hits a headword (first sub-entry of either
///   side)
///
/// Only the first occurrence is weighed; an entry whose second occurrence
/// would score higher keeps its first-occurrence weight.
pub fn score(entry: &Entry, pattern: &CompiledPattern) -> u32 {
    let stripped = MARKUP_SPANS.replace_all(entry.raw(), "");
    let clean = DOUBLE_SPACES.replace_all(&stripped, " ");
    let Some(m) = pattern.first_match(&clean) else {
        return 0;
    };
    let mut weight = 1;
    if m.index == 0 || UNIT_BEFORE.is_match(&clean[..m.index]) {
        weight += 4;
    }
    if m.end() == clean.len() || UNIT_AFTER.is_match(&clean[m.end()..]) {
        weight += 2;
    }
    let mut sides = clean.split(SIDE_SEPARATOR);
    let head0 = headword(sides.next());
    let head1 = headword(sides.next());
    if pattern.test(head0) || pattern.test(head1) {
        weight += 1;
    }
    weight
}

fn headword(side: Option<&str>) -> &str {
    side.and_then(|s| s.split(SUB_SEPARATOR).next())
        .unwrap_or("")
}

/// Filter, score, sort and truncate the corpus for one query.
///
/// Sorting is descending by weight with ties broken by ascending corpus
/// index: at equal weight, corpus order is a user-visible contract (an
/// explicit comparator, not incidental sort stability).
pub fn rank<'c>(
    corpus: &'c [Entry],
    query: &str,
    options: &SearchOptions,
) -> Result<RankedResult<'c>, QueryError> {
    let pattern = pattern::compile(query, options)?;

    let mut scored: Vec<(&Entry, u32, usize)> = corpus
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches(entry, &pattern))
        .map(|(i, entry)| (entry, score(entry, &pattern), i))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let truncated = scored.len() > options.max;
    if truncated {
        scored.truncate(options.max);
    }

    tracing::info!(
        query,
        results = scored.len(),
        truncated,
        "search_done"
    );

    Ok(RankedResult {
        pattern,
        entries: scored.into_iter().map(|(entry, _, _)| entry).collect(),
        truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(lines: &[&str]) -> Vec<Entry> {
        lines.iter().map(|line| Entry::new(*line)).collect()
    }

    fn weigh(line: &str, query: &str) -> u32 {
        let entry = Entry::new(line);
        let pattern =
            pattern::compile(query, &SearchOptions::default()).expect("query compiles");
        score(&entry, &pattern)
    }

    #[test]
    fn headword_at_entry_start_gets_both_bonuses() {
        // index 0 (+4), followed by " :: " (+2), headword (+1)
        assert_eq!(weigh("gehen :: to go", "gehen"), 8);
    }

    #[test]
    fn match_at_entry_end_gets_end_bonus() {
        // "trap" ends the entry (+2); it is preceded by "mouse " (no unit
        // boundary) and matches neither headword.
        assert_eq!(weigh("Falle :: snare | mouse trap", "trap"), 3);
    }

    #[test]
    fn mid_phrase_match_scores_base_weight() {
        assert_eq!(
            weigh("bauen | ein Haus bauen :: to build | to build a house", "haus"),
            1
        );
    }

    #[test]
    fn to_marker_counts_as_unit_start() {
        // " :: to " precedes the match (+4), entry end follows (+2),
        // side1 headword "to go" also matches (+1).
        assert_eq!(weigh("gehen :: to go", "go*"), 8);
    }

    #[test]
    fn match_only_inside_markup_weighs_zero() {
        let entry = Entry::new("laufen <haus> :: to walk");
        let pattern =
            pattern::compile("haus", &SearchOptions::default()).expect("query compiles");
        assert!(matches(&entry, &pattern), "raw text does match");
        assert_eq!(score(&entry, &pattern), 0);
    }

    #[test]
    fn headword_bonus_applies_on_either_side() {
        // First occurrence sits mid-phrase (no unit bonuses), but side1's
        // headword also matches, producing 1 + 1.
        assert_eq!(weigh("Falle :: a mouse trap | mouse", "mouse"), 2);
    }

    #[test]
    fn rank_rejects_short_queries() {
        let corpus = corpus(&["Haus :: house"]);
        let result = rank(&corpus, "ab", &SearchOptions::default());
        assert!(matches!(result, Err(QueryError::TooShort { .. })));
    }

    #[test]
    fn rank_filters_and_orders_by_weight() {
        let corpus = corpus(&[
            "ein Haus bauen :: to build a house",
            "Haus :: house",
            "Baum :: tree",
        ]);
        let ranked = rank(&corpus, "haus", &SearchOptions::default()).unwrap();
        let lines: Vec<&str> = ranked.entries.iter().map(|e| e.raw()).collect();
        assert_eq!(
            lines,
            vec!["Haus :: house", "ein Haus bauen :: to build a house"]
        );
        assert!(!ranked.truncated);
    }

    #[test]
    fn equal_weights_keep_corpus_order() {
        let corpus = corpus(&[
            "Haus :: house",
            "Haus :: dwelling",
            "Haus :: building",
        ]);
        let ranked = rank(&corpus, "haus", &SearchOptions::default()).unwrap();
        let lines: Vec<&str> = ranked.entries.iter().map(|e| e.raw()).collect();
        assert_eq!(
            lines,
            vec!["Haus :: house", "Haus :: dwelling", "Haus :: building"]
        );
    }

    #[test]
    fn results_beyond_max_are_truncated_and_flagged() {
        let entries: Vec<Entry> = (0..5)
            .map(|i| Entry::new(format!("Haus {i} :: house {i}")))
            .collect();
        let options = SearchOptions {
            max: 3,
            ..Default::default()
        };
        let ranked = rank(&entries, "haus", &options).unwrap();
        assert_eq!(ranked.entries.len(), 3);
        assert!(ranked.truncated);

        let wide = SearchOptions::default();
        let ranked = rank(&entries, "haus", &wide).unwrap();
        assert_eq!(ranked.entries.len(), 5);
        assert!(!ranked.truncated);
    }

    #[test]
    fn boundary_match_skips_word_interior() {
        let corpus = corpus(&["Haus :: house", "Mäuschen :: little mouse"]);
        let ranked = rank(&corpus, "haus", &SearchOptions::default()).unwrap();
        let lines: Vec<&str> = ranked.entries.iter().map(|e| e.raw()).collect();
        assert_eq!(lines, vec!["Haus :: house"]);
    }

    #[test]
    fn prefix_wildcard_reaches_mid_phrase() {
        let corpus = corpus(&["Haus :: house", "Mäuschen :: little mouse"]);
        let ranked = rank(&corpus, "* mouse", &SearchOptions::default()).unwrap();
        let lines: Vec<&str> = ranked.entries.iter().map(|e| e.raw()).collect();
        assert_eq!(lines, vec!["Mäuschen :: little mouse"]);
    }

    #[test]
    fn every_filtered_entry_scores_at_least_one() {
        let corpus = corpus(&[
            "gehen :: to go",
            "ein Haus :: a house",
            "gehen | laufen :: to go | to walk",
        ]);
        let pattern =
            pattern::compile("gehen", &SearchOptions::default()).expect("query compiles");
        for entry in &corpus {
            if matches(entry, &pattern) {
                assert!(score(entry, &pattern) >= 1);
            }
        }
    }
}
