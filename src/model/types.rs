//! Glossary entry grammar and search options.

use serde::{Deserialize, Serialize};

/// Separator between the two language sides of an entry.
pub const SIDE_SEPARATOR: &str = " :: ";

/// Separator between sub-entries within one side.
pub const SUB_SEPARATOR: &str = " | ";

/// One glossary line: `side0 :: side1`, each side holding one or more
/// sub-entries joined by `" | "`. Sub-entry *i* of side0 corresponds
/// positionally to sub-entry *i* of side1.
///
/// Entries are immutable and owned by the loaded corpus. Alignment of the
/// two sides is a corpus-quality invariant, not something enforced here;
/// see [`crate::corpus::audit`] for the offline check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    raw: String,
}

impl Entry {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The raw corpus line, markup and all.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Positionally aligned `(side0, side1)` sub-entry pairs.
    ///
    /// A missing counterpart (misaligned corpus line) pairs with an empty
    /// string rather than failing; malformed lines are a data defect, not
    /// a runtime error.
    pub fn sub_pairs(&self) -> Vec<(&str, &str)> {
        let mut sides = self.raw.split(SIDE_SEPARATOR);
        let side0: Vec<&str> = sides
            .next()
            .map(|s| s.split(SUB_SEPARATOR).collect())
            .unwrap_or_default();
        let side1: Vec<&str> = sides
            .next()
            .map(|s| s.split(SUB_SEPARATOR).collect())
            .unwrap_or_default();
        side0
            .iter()
            .enumerate()
            .map(|(i, a)| (*a, side1.get(i).copied().unwrap_or("")))
            .collect()
    }

    /// Whether the line has exactly two sides with equal sub-entry counts.
    pub fn is_aligned(&self) -> bool {
        let sides: Vec<&str> = self.raw.split(SIDE_SEPARATOR).collect();
        sides.len() == 2
            && sides[0].split(SUB_SEPARATOR).count() == sides[1].split(SUB_SEPARATOR).count()
    }
}

/// Options governing one search invocation.
///
/// Value object: constructed fresh per call, never mutated by the core.
/// `timeout` is a debounce hint for the caller's input layer; the core
/// stores and surfaces it but never consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Anchor matches to an entry/sub-entry boundary.
    pub start: bool,
    /// Require matches to end at a word boundary.
    pub end: bool,
    pub ignore_case: bool,
    /// Result cap; matches beyond it are withheld and flagged.
    pub max: usize,
    /// Debounce settle period in milliseconds (caller-owned concern).
    pub timeout: u64,
    /// Minimum normalized query length to attempt a search.
    pub min: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            start: false,
            end: true,
            ignore_case: true,
            max: 100,
            timeout: 2000,
            min: 3,
        }
    }
}

/// A partial update to [`SearchOptions`].
///
/// Numeric fields arrive as raw floats so that non-integer input can be
/// detected and rejected: any value that is non-finite, `<= 0`, or not a
/// whole number keeps the previous setting instead of applying.
#[derive(Debug, Clone, Default)]
pub struct OptionsPatch {
    pub start: Option<bool>,
    pub end: Option<bool>,
    pub ignore_case: Option<bool>,
    pub max: Option<f64>,
    pub timeout: Option<f64>,
    pub min: Option<f64>,
}

impl OptionsPatch {
    /// Apply this patch on top of `base`, falling back to the previous
    /// value for every invalid numeric field.
    pub fn apply(&self, base: &SearchOptions) -> SearchOptions {
        let mut next = base.clone();
        if let Some(start) = self.start {
            next.start = start;
        }
        if let Some(end) = self.end {
            next.end = end;
        }
        if let Some(ignore_case) = self.ignore_case {
            next.ignore_case = ignore_case;
        }
        if let Some(max) = self.max {
            match positive_integer(max) {
                Some(v) => next.max = v as usize,
                None => tracing::warn!(value = max, "invalid max, keeping previous"),
            }
        }
        if let Some(timeout) = self.timeout {
            match positive_integer(timeout) {
                Some(v) => next.timeout = v,
                None => tracing::warn!(value = timeout, "invalid timeout, keeping previous"),
            }
        }
        if let Some(min) = self.min {
            match positive_integer(min) {
                Some(v) => next.min = v as usize,
                None => tracing::warn!(value = min, "invalid min, keeping previous"),
            }
        }
        next
    }
}

fn positive_integer(value: f64) -> Option<u64> {
    if value.is_finite() && value > 0.0 && value.fract() == 0.0 {
        Some(value as u64)
    } else {
        None
    }
}
