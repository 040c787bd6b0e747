//! Record model for contacts and notes.
//!
//! # Responsibility
//! - Define validated field value types and the two record kinds built on them.
//! - Keep all record invariants inside constructors and mutators.
//!
//! # Invariants
//! - Records are plain owned data: no I/O, no logging, no global state.
//! - Validation always happens before mutation.

pub mod contact;
pub mod field;
pub mod note;
