//! Domain model for tasks and users.
//!
//! # Responsibility
//! - Define canonical records used by core business logic.
//! - Own field-level validation rules (non-blank, email format).
//!
//! # Invariants
//! - Identifiers are assigned by storage; `id == None` means unsaved.
//! - Records are plain values; services hold no cached copies.

pub mod task;
pub mod user;
