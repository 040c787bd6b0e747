//! Keyed in-memory collections of records.
//!
//! # Responsibility
//! - Own contact and note records exclusively, keyed by name/title.
//! - Host the query algorithms that span many records.
//!
//! # Invariants
//! - Absence is reported as `None`/`false`, never as an error.
//! - Existence checks before insertion belong to callers; `add` overwrites.

pub mod contacts;
pub mod notes;
