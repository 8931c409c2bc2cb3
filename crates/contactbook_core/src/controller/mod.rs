//! Contact list controller.
//!
//! # Responsibility
//! - Hold the ordered in-memory sequence the list currently shows.
//! - Submit store operations and apply their completions on the owning
//!   thread.
//! - Re-read the whole store after every mutation.
//!
//! # Invariants
//! - Only `pump`/`wait_idle` mutate the sequence from store results; worker
//!   tasks never touch it.
//! - Every mutation completion, success or failure, triggers one `refresh`.
//! - A listing with a lower revision than the applied one is discarded.
//! - After the refresh following a mutation completes, the sequence equals
//!   the store contents at that revision.

use crate::model::contact::{Contact, ContactFields, ContactId};
use crate::store::{ContactSnapshot, ContactStore, StoreCompletion, StoreError};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{Duration, Instant};

pub type ControllerResult<T> = Result<T, ControllerError>;

/// Errors raised synchronously while submitting an operation.
#[derive(Debug)]
pub enum ControllerError {
    Store(StoreError),
    /// `update` addressed an index outside the cached sequence.
    PositionOutOfRange { position: usize, len: usize },
}

impl Display for ControllerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::PositionOutOfRange { position, len } => write!(
                f,
                "contact position {position} is out of range for {len} cached contact(s)"
            ),
        }
    }
}

impl Error for ControllerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::PositionOutOfRange { .. } => None,
        }
    }
}

impl From<StoreError> for ControllerError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Which store call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Insert,
    Update,
    Delete,
}

/// Outcome of applying one completion on the owning thread.
#[derive(Debug)]
pub enum ListEvent {
    /// The cached sequence was replaced wholesale.
    Replaced { len: usize },
    /// Insert finished with the assigned id.
    Added { contact_id: ContactId },
    /// Update finished; `existed == false` means it was a no-op.
    Updated { contact_id: ContactId, existed: bool },
    /// Delete finished; `existed == false` means it was a no-op.
    Removed { contact_id: ContactId, existed: bool },
    StoreFailed {
        operation: StoreOperation,
        error: StoreError,
    },
}

/// In-memory mediator between the store and the list presentation.
pub struct ContactListController {
    store: ContactStore,
    contacts: Vec<Contact>,
    applied_revision: Option<u64>,
    in_flight: usize,
    reply_tx: Sender<StoreCompletion>,
    reply_rx: Receiver<StoreCompletion>,
}

impl ContactListController {
    /// Creates a controller with an empty sequence. Call `refresh` to load.
    pub fn new(store: ContactStore) -> Self {
        let (reply_tx, reply_rx) = crossbeam_channel::unbounded();
        Self {
            store,
            contacts: Vec::new(),
            applied_revision: None,
            in_flight: 0,
            reply_tx,
            reply_rx,
        }
    }

    /// The currently shown sequence.
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn contact_at(&self, position: usize) -> Option<&Contact> {
        self.contacts.get(position)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Number of submitted operations whose completion was not applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    /// Re-reads the full store; the sequence is replaced on completion.
    pub fn refresh(&mut self) -> ControllerResult<()> {
        self.store.list_all(self.reply_tx.clone())?;
        self.in_flight += 1;
        Ok(())
    }

    /// Submits a new contact built from `fields` with id 0.
    pub fn add(&mut self, fields: ContactFields) -> ControllerResult<()> {
        self.store.insert(Contact::new(fields), self.reply_tx.clone())?;
        self.in_flight += 1;
        info!("event=contact_add module=controller status=submitted");
        Ok(())
    }

    /// Rewrites the contact currently cached at `position`.
    ///
    /// The cached entry is changed immediately; the store update follows.
    /// `position` is resolved against the sequence as it is now, so an edit
    /// opened before a concurrent change lands on whatever sits there.
    pub fn update(&mut self, fields: ContactFields, position: usize) -> ControllerResult<()> {
        let len = self.contacts.len();
        let Some(cached) = self.contacts.get_mut(position) else {
            error!(
                "event=contact_update module=controller status=error error_code=position_out_of_range position={position} len={len}"
            );
            return Err(ControllerError::PositionOutOfRange { position, len });
        };

        cached.apply(fields);
        let contact = cached.clone();
        self.submit_update(contact)
    }

    /// Rewrites the contact with `contact_id`, wherever it sits in the list.
    pub fn update_by_id(
        &mut self,
        contact_id: ContactId,
        fields: ContactFields,
    ) -> ControllerResult<()> {
        let contact = match self.contacts.iter_mut().find(|c| c.id == contact_id) {
            Some(cached) => {
                cached.apply(fields);
                cached.clone()
            }
            None => Contact::with_id(contact_id, fields),
        };
        self.submit_update(contact)
    }

    /// Submits removal of `contact` (matched by id).
    pub fn delete(&mut self, contact: &Contact) -> ControllerResult<()> {
        self.store.delete(contact, self.reply_tx.clone())?;
        self.in_flight += 1;
        info!(
            "event=contact_delete module=controller status=submitted contact_id={}",
            contact.id
        );
        Ok(())
    }

    /// Applies every completion that already arrived, without blocking.
    pub fn pump(&mut self) -> Vec<ListEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.reply_rx.try_recv() {
            self.apply(completion, &mut events);
        }
        events
    }

    /// Blocks until nothing is in flight or `timeout` elapses.
    ///
    /// Refreshes triggered by completions received here are waited for too.
    /// A `timeout` too large to represent waits without a deadline.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<ListEvent> {
        let deadline = Instant::now().checked_add(timeout);
        let mut events = Vec::new();
        while self.in_flight > 0 {
            let received = match deadline {
                Some(deadline) => self
                    .reply_rx
                    .recv_timeout(deadline.saturating_duration_since(Instant::now())),
                None => self
                    .reply_rx
                    .recv()
                    .map_err(|_| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(completion) => self.apply(completion, &mut events),
                Err(RecvTimeoutError::Timeout) => {
                    debug!(
                        "event=wait_idle module=controller status=timeout in_flight={}",
                        self.in_flight
                    );
                    break;
                }
                // The controller keeps its own sender alive.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        events
    }

    fn submit_update(&mut self, contact: Contact) -> ControllerResult<()> {
        let contact_id = contact.id;
        self.store.update(contact, self.reply_tx.clone())?;
        self.in_flight += 1;
        info!("event=contact_update module=controller status=submitted contact_id={contact_id}");
        Ok(())
    }

    fn apply(&mut self, completion: StoreCompletion, events: &mut Vec<ListEvent>) {
        self.in_flight = self.in_flight.saturating_sub(1);

        let mutation = match completion {
            StoreCompletion::Listed(Ok(snapshot)) => {
                if let Some(event) = self.replace(snapshot) {
                    events.push(event);
                }
                return;
            }
            StoreCompletion::Listed(Err(error)) => {
                events.push(ListEvent::StoreFailed {
                    operation: StoreOperation::List,
                    error,
                });
                return;
            }
            StoreCompletion::Inserted(result) => result
                .map(|contact_id| ListEvent::Added { contact_id })
                .map_err(|error| (StoreOperation::Insert, error)),
            StoreCompletion::Updated { contact_id, result } => result
                .map(|existed| ListEvent::Updated {
                    contact_id,
                    existed,
                })
                .map_err(|error| (StoreOperation::Update, error)),
            StoreCompletion::Deleted { contact_id, result } => result
                .map(|existed| ListEvent::Removed {
                    contact_id,
                    existed,
                })
                .map_err(|error| (StoreOperation::Delete, error)),
        };

        events.push(match mutation {
            Ok(event) => event,
            Err((operation, error)) => ListEvent::StoreFailed { operation, error },
        });

        if let Err(err) = self.refresh() {
            error!(
                "event=contact_refresh module=controller status=error error_code=submit_failed error={err}"
            );
        }
    }

    fn replace(&mut self, snapshot: ContactSnapshot) -> Option<ListEvent> {
        if let Some(applied) = self.applied_revision {
            if snapshot.revision < applied {
                debug!(
                    "event=contact_refresh module=controller status=stale revision={} applied_revision={applied}",
                    snapshot.revision
                );
                return None;
            }
        }

        self.applied_revision = Some(snapshot.revision);
        self.contacts = snapshot.contacts;
        debug!(
            "event=contact_refresh module=controller status=ok revision={} len={}",
            snapshot.revision,
            self.contacts.len()
        );
        Some(ListEvent::Replaced {
            len: self.contacts.len(),
        })
    }
}
