//! Domain model for categories and notes.
//!
//! # Responsibility
//! - Define the canonical records persisted by the entity store.
//! - Define the partial input shapes accepted by reconciliation services.
//! - Own field normalization and validation shared by both entity kinds.
//!
//! # Invariants
//! - Every note references exactly one category by surrogate id.
//! - Surrogate ids are assigned by storage and never reused by callers.

pub mod category;
pub mod note;
pub mod validation;
