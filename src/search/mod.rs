//! Search layer facade.
//!
//! Two stages, compiled once per query and applied per entry:
//!
//! - **[`pattern`]**: query normalization and compilation into a
//!   [`pattern::CompiledPattern`] (test + first-match).
//! - **[`rank`]**: the filter → score → stable-sort → truncate pipeline
//!   over the in-memory corpus.
//!
//! The whole layer is synchronous, stateless and re-entrant; overlapping
//! calls are safe and sequencing of results is the caller's concern.

pub mod pattern;
pub mod rank;
