//! Asynchronous contact store.
//!
//! # Responsibility
//! - Own the process-wide contacts connection for the process lifetime.
//! - Run every store operation as a one-shot background task.
//! - Deliver each result as a `StoreCompletion` over the caller's channel.
//!
//! # Invariants
//! - No operation returns data synchronously; results only arrive as
//!   completions.
//! - All operations serialize on one connection lock; completion order
//!   across calls is unspecified.
//! - `revision` grows by one for every mutation that changed a row and is
//!   read under the same lock as the listing it stamps.
//! - A submitted operation always runs to completion; there is no cancel.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{ContactRepository, RepoError, SqliteContactRepository};
use crossbeam_channel::Sender;
use log::{debug, error, warn};
use parking_lot::Mutex;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of one store operation.
#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    /// Background task could not be started.
    Spawn(std::io::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Spawn(err) => write!(f, "failed to start contact store task: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Spawn(err) => Some(err),
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

/// Full listing stamped with the store revision it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSnapshot {
    pub revision: u64,
    /// Insertion order.
    pub contacts: Vec<Contact>,
}

/// Result message sent back to the submitting thread.
#[derive(Debug)]
pub enum StoreCompletion {
    Listed(StoreResult<ContactSnapshot>),
    Inserted(StoreResult<ContactId>),
    /// `Ok(false)` means no row had `contact_id`.
    Updated {
        contact_id: ContactId,
        result: StoreResult<bool>,
    },
    /// `Ok(false)` means no row had `contact_id`.
    Deleted {
        contact_id: ContactId,
        result: StoreResult<bool>,
    },
}

struct StoreState {
    conn: Connection,
    revision: u64,
}

impl StoreState {
    fn repo(&self) -> SqliteContactRepository<'_> {
        SqliteContactRepository::assume_ready(&self.conn)
    }
}

/// Cloneable handle to the process-local contacts store.
#[derive(Clone)]
pub struct ContactStore {
    state: Arc<Mutex<StoreState>>,
}

impl ContactStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::from_connection(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// - Returns repository readiness errors when the schema is not current.
    pub fn from_connection(conn: Connection) -> StoreResult<Self> {
        SqliteContactRepository::try_new(&conn)?;
        Ok(Self {
            state: Arc::new(Mutex::new(StoreState { conn, revision: 0 })),
        })
    }

    /// Current mutation revision.
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    /// Reads all contacts; completes with `StoreCompletion::Listed`.
    pub fn list_all(&self, reply: Sender<StoreCompletion>) -> StoreResult<()> {
        self.spawn(
            "list_all",
            reply,
            |state| {
                let contacts = state.repo().list_contacts()?;
                Ok(ContactSnapshot {
                    revision: state.revision,
                    contacts,
                })
            },
            StoreCompletion::Listed,
        )
    }

    /// Inserts `contact`; completes with the assigned id.
    pub fn insert(&self, contact: Contact, reply: Sender<StoreCompletion>) -> StoreResult<()> {
        self.spawn(
            "insert",
            reply,
            move |state| {
                let id = state.repo().insert_contact(&contact)?;
                state.revision += 1;
                Ok(id)
            },
            StoreCompletion::Inserted,
        )
    }

    /// Updates the row matching `contact.id`; a missing row is not an error.
    pub fn update(&self, contact: Contact, reply: Sender<StoreCompletion>) -> StoreResult<()> {
        let contact_id = contact.id;
        self.spawn(
            "update",
            reply,
            move |state| {
                let changed = state.repo().update_contact(&contact)?;
                if changed {
                    state.revision += 1;
                } else {
                    warn!("event=store_update module=store status=noop contact_id={contact_id}");
                }
                Ok(changed)
            },
            move |result| StoreCompletion::Updated { contact_id, result },
        )
    }

    /// Deletes the row matching `contact.id`; a missing row is not an error.
    pub fn delete(&self, contact: &Contact, reply: Sender<StoreCompletion>) -> StoreResult<()> {
        let contact_id = contact.id;
        self.spawn(
            "delete",
            reply,
            move |state| {
                let changed = state.repo().delete_contact(contact_id)?;
                if changed {
                    state.revision += 1;
                } else {
                    warn!("event=store_delete module=store status=noop contact_id={contact_id}");
                }
                Ok(changed)
            },
            move |result| StoreCompletion::Deleted { contact_id, result },
        )
    }

    fn spawn<T, W, C>(
        &self,
        operation: &'static str,
        reply: Sender<StoreCompletion>,
        work: W,
        complete: C,
    ) -> StoreResult<()>
    where
        T: Send + 'static,
        W: FnOnce(&mut StoreState) -> StoreResult<T> + Send + 'static,
        C: FnOnce(StoreResult<T>) -> StoreCompletion + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let task = move || {
            let started_at = Instant::now();
            let result = {
                let mut guard = state.lock();
                work(&mut *guard)
            };
            match &result {
                Ok(_) => debug!(
                    "event=store_op module=store status=ok op={operation} duration_ms={}",
                    started_at.elapsed().as_millis()
                ),
                Err(err) => error!(
                    "event=store_op module=store status=error op={operation} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                ),
            }
            if reply.send(complete(result)).is_err() {
                warn!("event=store_op module=store status=dropped op={operation} reason=receiver_closed");
            }
        };

        thread::Builder::new()
            .name(format!("contact-store-{operation}"))
            .spawn(task)
            .map(|_| ())
            .map_err(|err| {
                error!(
                    "event=store_op module=store status=error op={operation} error_code=spawn_failed error={err}"
                );
                StoreError::Spawn(err)
            })
    }
}
