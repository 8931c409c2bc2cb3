//! List presentation adapter.
//!
//! # Responsibility
//! - Map sequence indexes to renderable `ContactRow`s.
//! - Tell the UI to redraw everything whenever a new sequence is published.
//! - Forward row taps to the form coordinator and left swipes to the
//!   controller.
//!
//! # Invariants
//! - Rows are replaced wholesale; there is no diffing.
//! - Only `SwipeDirection::Left` deletes.
//! - Events for indexes outside the current rows are ignored.

use crate::controller::{ContactListController, ControllerResult};
use crate::form::{EditFormCoordinator, FormView};
use crate::model::contact::{Contact, ContactId};
use crate::ui::ContactListUi;
use log::debug;

/// Content of one list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    pub contact_id: ContactId,
    /// "First Last".
    pub display_name: String,
    pub email: String,
    pub phone_number: String,
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            contact_id: contact.id,
            display_name: contact.display_name(),
            email: contact.email.clone(),
            phone_number: contact.phone_number.clone(),
        }
    }
}

/// Horizontal swipe released on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Debug, Default)]
pub struct ContactListAdapter {
    contacts: Vec<Contact>,
}

impl ContactListAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all rows and asks the UI for a full redraw.
    pub fn set_contacts(&mut self, contacts: Vec<Contact>, ui: &dyn ContactListUi) {
        self.contacts = contacts;
        ui.notify_data_set_changed();
    }

    pub fn item_count(&self) -> usize {
        self.contacts.len()
    }

    pub fn row(&self, position: usize) -> Option<ContactRow> {
        self.contacts.get(position).map(ContactRow::from)
    }

    pub fn rows(&self) -> Vec<ContactRow> {
        self.contacts.iter().map(ContactRow::from).collect()
    }

    /// Opens the edit form for the tapped row.
    ///
    /// Returns the form to present, or `None` when the index is stale.
    pub fn on_row_tapped(
        &self,
        position: usize,
        form: &mut EditFormCoordinator,
    ) -> Option<FormView> {
        let Some(contact) = self.contacts.get(position) else {
            debug!("event=row_tap module=adapter status=ignored position={position}");
            return None;
        };
        Some(form.open_edit(contact.clone(), position))
    }

    /// Deletes the contact under a left swipe. Returns whether a delete was
    /// submitted.
    pub fn on_row_swiped(
        &self,
        position: usize,
        direction: SwipeDirection,
        controller: &mut ContactListController,
    ) -> ControllerResult<bool> {
        if direction != SwipeDirection::Left {
            return Ok(false);
        }
        let Some(contact) = self.contacts.get(position) else {
            debug!("event=row_swipe module=adapter status=ignored position={position}");
            return Ok(false);
        };
        controller.delete(contact)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactListAdapter, ContactRow, SwipeDirection};
    use crate::controller::ContactListController;
    use crate::form::{EditFormCoordinator, FormMode};
    use crate::model::contact::{Contact, ContactFields};
    use crate::store::ContactStore;
    use crate::ui::ContactListUi;
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingUi {
        redraws: Cell<usize>,
    }

    impl ContactListUi for CountingUi {
        fn notify_data_set_changed(&self) {
            self.redraws.set(self.redraws.get() + 1);
        }
    }

    fn sample() -> Vec<Contact> {
        vec![
            Contact::with_id(
                1,
                ContactFields::new("Ada", "Lovelace", "ada@example.com", "5550100"),
            ),
            Contact::with_id(
                2,
                ContactFields::new("Alan", "Turing", "alan@example.com", "5550101"),
            ),
        ]
    }

    #[test]
    fn set_contacts_replaces_rows_and_notifies_once() {
        let ui = CountingUi::default();
        let mut adapter = ContactListAdapter::new();

        adapter.set_contacts(sample(), &ui);

        assert_eq!(adapter.item_count(), 2);
        assert_eq!(ui.redraws.get(), 1);
        assert_eq!(
            adapter.row(1),
            Some(ContactRow {
                contact_id: 2,
                display_name: "Alan Turing".to_string(),
                email: "alan@example.com".to_string(),
                phone_number: "5550101".to_string(),
            })
        );
        assert_eq!(adapter.row(2), None);
    }

    #[test]
    fn tap_opens_edit_form_with_position() {
        let ui = CountingUi::default();
        let mut adapter = ContactListAdapter::new();
        adapter.set_contacts(sample(), &ui);
        let mut form = EditFormCoordinator::new();

        let view = adapter.on_row_tapped(1, &mut form).unwrap();

        assert_eq!(view.title, "Edit Contact");
        assert_eq!(view.fields.first_name, "Alan");
        match form.mode() {
            Some(FormMode::Edit { position, contact }) => {
                assert_eq!(*position, 1);
                assert_eq!(contact.id, 2);
            }
            other => panic!("unexpected form mode: {other:?}"),
        }
        assert!(adapter.on_row_tapped(5, &mut form).is_none());
    }

    #[test]
    fn only_left_swipe_submits_delete() {
        let ui = CountingUi::default();
        let mut adapter = ContactListAdapter::new();
        adapter.set_contacts(sample(), &ui);
        let mut controller = ContactListController::new(ContactStore::open_in_memory().unwrap());

        assert!(!adapter
            .on_row_swiped(0, SwipeDirection::Right, &mut controller)
            .unwrap());
        assert!(!adapter
            .on_row_swiped(9, SwipeDirection::Left, &mut controller)
            .unwrap());
        assert_eq!(controller.in_flight(), 0);

        assert!(adapter
            .on_row_swiped(0, SwipeDirection::Left, &mut controller)
            .unwrap());
        assert_eq!(controller.in_flight(), 1);
    }
}
