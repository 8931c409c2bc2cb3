//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record shared by store, controller and UI.
//!
//! # Invariants
//! - Identifier `0` marks a contact that has not been persisted yet.
//! - Persisted contacts have four non-empty text fields.

pub mod contact;
