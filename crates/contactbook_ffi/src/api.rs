//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the contact list operations as blocking, use-case level calls.
//! - Keep one process-wide store and controller behind a lock.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Each call returns only after its store work and the follow-up refresh
//!   completed (or the wait timed out).
//! - A call first drains completions an earlier timed-out call left behind,
//!   and reports only the event matching its own operation and id.
//! - Validation messages are the same strings the add/edit form shows.

use contactbook_core::db::DB_FILE_NAME;
use contactbook_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, validate_fields, Contact, ContactFields, ContactId,
    ContactListController, ContactStore, ListEvent, StoreOperation,
};
use log::{error, info, warn};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::time::Duration;

const DB_PATH_ENV: &str = "CONTACTBOOK_DB_PATH";
const COMPLETION_WAIT: Duration = Duration::from_secs(10);

static DB_PATH: OnceCell<PathBuf> = OnceCell::new();
static SESSION: OnceCell<Mutex<ContactListController>> = OnceCell::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Level the host should pass to `init_logging` when the user picked none.
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().to_owned()
}

/// One contact as rendered by the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub contact_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl From<&Contact> for ContactItem {
    fn from(contact: &Contact) -> Self {
        Self {
            contact_id: contact.id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            email: contact.email.clone(),
            phone_number: contact.phone_number.clone(),
        }
    }
}

/// Full list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    /// Insertion order.
    pub items: Vec<ContactItem>,
    pub message: String,
}

/// Result envelope for add/update/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    /// Id of the contact the action touched, when known.
    pub contact_id: Option<i64>,
    /// Human-readable message for UI toasts and diagnostics.
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: ContactId) -> Self {
        Self {
            ok: true,
            contact_id: Some(contact_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            message: message.into(),
        }
    }
}

/// Re-reads and returns every stored contact.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; on failure `items` is empty and `message` explains why.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    let result = with_session(|controller| {
        settle(controller)?;
        controller.refresh().map_err(|err| err.to_string())?;
        if let Some(message) = first_failure(controller.wait_idle(COMPLETION_WAIT)) {
            return Err(message);
        }
        Ok(controller
            .contacts()
            .iter()
            .map(ContactItem::from)
            .collect::<Vec<_>>())
    });

    match result {
        Ok(items) => {
            let message = if items.is_empty() {
                "No contacts.".to_string()
            } else {
                format!("{} contact(s).", items.len())
            };
            ContactListResponse { items, message }
        }
        Err(err) => ContactListResponse {
            items: Vec::new(),
            message: format!("contacts_list failed: {err}"),
        },
    }
}

/// Validates and stores a new contact.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Empty fields fail with the form message (e.g. `Enter first name`).
/// - Returns the store-assigned id on success.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_add(
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
) -> ContactActionResponse {
    let fields = ContactFields::new(first_name, last_name, email, phone_number);
    if let Err(err) = validate_fields(&fields) {
        return ContactActionResponse::failure(err.user_message());
    }

    let outcome = with_session(|controller| {
        settle(controller)?;
        controller.add(fields).map_err(|err| err.to_string())?;
        Ok(controller.wait_idle(COMPLETION_WAIT))
    });

    match outcome {
        Ok(events) => add_response(events),
        Err(err) => ContactActionResponse::failure(format!("contact_add failed: {err}")),
    }
}

/// Validates and rewrites the contact with `contact_id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Addresses the contact by id, never by list position.
/// - An unknown id is not an error; `message` says nothing matched.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_update(
    contact_id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone_number: String,
) -> ContactActionResponse {
    let fields = ContactFields::new(first_name, last_name, email, phone_number);
    if let Err(err) = validate_fields(&fields) {
        return ContactActionResponse::failure(err.user_message());
    }

    let outcome = with_session(|controller| {
        settle(controller)?;
        controller
            .update_by_id(contact_id, fields)
            .map_err(|err| err.to_string())?;
        Ok(controller.wait_idle(COMPLETION_WAIT))
    });

    match outcome {
        Ok(events) => update_response(contact_id, events),
        Err(err) => ContactActionResponse::failure(format!("contact_update failed: {err}")),
    }
}

/// Removes the contact with `contact_id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Deleting an unknown id is a successful no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(contact_id: i64) -> ContactActionResponse {
    let outcome = with_session(|controller| {
        settle(controller)?;
        let target = controller
            .contacts()
            .iter()
            .find(|contact| contact.id == contact_id)
            .cloned()
            .unwrap_or_else(|| Contact::with_id(contact_id, ContactFields::default()));
        controller.delete(&target).map_err(|err| err.to_string())?;
        Ok(controller.wait_idle(COMPLETION_WAIT))
    });

    match outcome {
        Ok(events) => delete_response(contact_id, events),
        Err(err) => ContactActionResponse::failure(format!("contact_delete failed: {err}")),
    }
}

fn add_response(events: Vec<ListEvent>) -> ContactActionResponse {
    events
        .into_iter()
        .find_map(|event| match event {
            ListEvent::Added { contact_id } => {
                Some(ContactActionResponse::success("Contact saved.", contact_id))
            }
            ListEvent::StoreFailed {
                operation: StoreOperation::Insert,
                error,
            } => Some(ContactActionResponse::failure(format!(
                "contact_add failed: {error}"
            ))),
            _ => None,
        })
        .unwrap_or_else(|| {
            ContactActionResponse::failure("contact_add failed: store did not respond")
        })
}

fn update_response(target: ContactId, events: Vec<ListEvent>) -> ContactActionResponse {
    events
        .into_iter()
        .find_map(|event| match event {
            ListEvent::Updated {
                contact_id,
                existed,
            } if contact_id == target => Some(if existed {
                ContactActionResponse::success("Contact updated.", contact_id)
            } else {
                ContactActionResponse::success("No contact matched; nothing updated.", contact_id)
            }),
            ListEvent::StoreFailed {
                operation: StoreOperation::Update,
                error,
            } => Some(ContactActionResponse::failure(format!(
                "contact_update failed: {error}"
            ))),
            _ => None,
        })
        .unwrap_or_else(|| {
            ContactActionResponse::failure("contact_update failed: store did not respond")
        })
}

fn delete_response(target: ContactId, events: Vec<ListEvent>) -> ContactActionResponse {
    events
        .into_iter()
        .find_map(|event| match event {
            ListEvent::Removed {
                contact_id,
                existed,
            } if contact_id == target => Some(if existed {
                ContactActionResponse::success("Contact deleted.", contact_id)
            } else {
                ContactActionResponse::success("No contact matched; nothing deleted.", contact_id)
            }),
            ListEvent::StoreFailed {
                operation: StoreOperation::Delete,
                error,
            } => Some(ContactActionResponse::failure(format!(
                "contact_delete failed: {error}"
            ))),
            _ => None,
        })
        .unwrap_or_else(|| {
            ContactActionResponse::failure("contact_delete failed: store did not respond")
        })
}

/// Drains work left over from an earlier call that timed out.
fn settle(controller: &mut ContactListController) -> Result<(), String> {
    if controller.in_flight() == 0 {
        return Ok(());
    }
    let drained = controller.wait_idle(COMPLETION_WAIT);
    warn!(
        "event=session_settle module=ffi status=drained events={} in_flight={}",
        drained.len(),
        controller.in_flight()
    );
    if controller.in_flight() > 0 {
        return Err("store is still busy with an earlier call".to_string());
    }
    Ok(())
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_session<T>(
    f: impl FnOnce(&mut ContactListController) -> Result<T, String>,
) -> Result<T, String> {
    let session = SESSION.get_or_try_init(|| -> Result<_, String> {
        let path = resolve_db_path();
        let store = ContactStore::open(&path).map_err(|err| {
            error!("event=session_open module=ffi status=error error={err}");
            format!("contact store open failed: {err}")
        })?;
        info!(
            "event=session_open module=ffi status=ok db_path={}",
            path.display()
        );
        Ok(Mutex::new(ContactListController::new(store)))
    })?;

    let mut controller = session.lock();
    f(&mut controller)
}

fn first_failure(events: Vec<ListEvent>) -> Option<String> {
    events.into_iter().find_map(|event| match event {
        ListEvent::StoreFailed { error, .. } => Some(error.to_string()),
        _ => None,
    })
}
