//! Core logic for the contact book screen.
//!
//! Owns the contact model, the SQLite-backed store, the list controller, the
//! list adapter and the add/edit form. Rendering stays in the platform UI,
//! which plugs in through `ContactListUi`.

pub mod adapter;
pub mod controller;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod screen;
pub mod store;
pub mod ui;

pub use adapter::{ContactListAdapter, ContactRow, SwipeDirection};
pub use controller::{
    ContactListController, ControllerError, ControllerResult, ListEvent, StoreOperation,
};
pub use form::{
    missing_field_message, validate_fields, EditFormCoordinator, FormError, FormMode,
    FormSubmission, FormView,
};
pub use logging::{default_log_level, init_logging, logging_status, LogConfig, LoggingError};
pub use model::contact::{
    Contact, ContactField, ContactFields, ContactId, ContactValidationError, NEW_CONTACT_ID,
};
pub use repo::contact_repo::{
    ContactRepository, RepoError, RepoResult, SqliteContactRepository,
};
pub use screen::ContactScreen;
pub use store::{ContactSnapshot, ContactStore, StoreCompletion, StoreError, StoreResult};
pub use ui::ContactListUi;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
