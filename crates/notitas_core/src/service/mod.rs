//! Reconciliation services.
//!
//! # Responsibility
//! - Decide create vs update for each incoming mutation.
//! - Resolve omitted fields to defaults and keep note -> category references
//!   valid.
//! - Keep transport layers decoupled from storage details.

pub mod category_service;
pub mod error;
pub mod note_service;
