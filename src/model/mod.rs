//! Core entity structs shared across the crate.

pub mod types;
