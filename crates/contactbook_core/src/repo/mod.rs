//! Repository layer for contact persistence.
//!
//! # Responsibility
//! - Define the synchronous data access contract used by the store.
//! - Isolate SQLite query details from store/controller orchestration.
//!
//! # Invariants
//! - Repository writes enforce `Contact::validate()` before persistence.

pub mod contact_repo;
