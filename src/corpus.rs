//! Corpus loading for glossary files.
//!
//! A corpus is a flat text file, one entry per line. Blank lines and
//! lines starting with `#` are comments and never reach the search core.
//! Entries are held in memory for the process lifetime; the core does a
//! linear scan per search, which is the intended design for corpora in
//! the low thousands of entries.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::types::Entry;

/// Load and parse a glossary file.
pub fn load(path: &Path) -> Result<Vec<Entry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus {}", path.display()))?;
    let entries = parse(&raw);
    tracing::debug!(path = %path.display(), entries = entries.len(), "corpus_loaded");
    Ok(entries)
}

/// Parse corpus text, dropping blank lines and `#` comments.
pub fn parse(raw: &str) -> Vec<Entry> {
    raw.lines()
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Entry::new)
        .collect()
}

/// A corpus line whose two sides do not align.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misaligned<'c> {
    /// Zero-based position within the loaded corpus (comments excluded).
    pub index: usize,
    pub text: &'c str,
}

/// Report entries with mismatched sub-entry counts.
///
/// Malformed lines are never rejected at search time; this audit exists
/// so corpus regressions get caught offline (`glos validate`, test
/// suites) instead.
pub fn audit(entries: &[Entry]) -> Vec<Misaligned<'_>> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| !entry.is_aligned())
        .map(|(index, entry)| Misaligned {
            index,
            text: entry.raw(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blanks_are_dropped() {
        let raw = "# dictionary v1\n\nHaus :: house\n# pending\ngehen :: to go\n";
        let entries = parse(raw);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].raw(), "Haus :: house");
        assert_eq!(entries[1].raw(), "gehen :: to go");
    }

    #[test]
    fn audit_flags_mismatched_sides() {
        let entries = parse("Haus :: house\na | b :: one\nno separator here\n");
        let bad = audit(&entries);
        assert_eq!(bad.len(), 2);
        assert_eq!(bad[0].index, 1);
        assert_eq!(bad[0].text, "a | b :: one");
        assert_eq!(bad[1].index, 2);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load(Path::new("/nonexistent/glossary.txt")).unwrap_err();
        assert!(err.to_string().contains("failed to read corpus"));
    }
}
