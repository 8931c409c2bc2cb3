//! Contact list screen wiring.
//!
//! # Responsibility
//! - Own controller, adapter and form coordinator for one screen.
//! - Route platform UI events to them and push results back to the UI.
//!
//! # Invariants
//! - All calls happen on the thread that owns the screen.
//! - A batch of events containing `ListEvent::Replaced` reaches the adapter
//!   as exactly one full replace.

use crate::adapter::{ContactListAdapter, SwipeDirection};
use crate::controller::{ContactListController, ControllerResult, ListEvent};
use crate::form::{EditFormCoordinator, FormError, FormSubmission};
use crate::model::contact::ContactFields;
use crate::store::ContactStore;
use crate::ui::ContactListUi;
use log::{error, warn};
use std::time::Duration;

pub struct ContactScreen<U: ContactListUi> {
    controller: ContactListController,
    adapter: ContactListAdapter,
    form: EditFormCoordinator,
    ui: U,
}

impl<U: ContactListUi> ContactScreen<U> {
    /// Builds the screen and starts the initial load.
    pub fn new(store: ContactStore, ui: U) -> ControllerResult<Self> {
        let mut controller = ContactListController::new(store);
        controller.refresh()?;
        Ok(Self {
            controller,
            adapter: ContactListAdapter::new(),
            form: EditFormCoordinator::new(),
            ui,
        })
    }

    pub fn controller(&self) -> &ContactListController {
        &self.controller
    }

    pub fn adapter(&self) -> &ContactListAdapter {
        &self.adapter
    }

    pub fn form(&self) -> &EditFormCoordinator {
        &self.form
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// The floating "add" button.
    pub fn on_add_clicked(&mut self) {
        let view = self.form.open_add();
        self.ui.show_form(&view);
    }

    pub fn on_row_tapped(&mut self, position: usize) {
        if let Some(view) = self.adapter.on_row_tapped(position, &mut self.form) {
            self.ui.show_form(&view);
        }
    }

    pub fn on_row_swiped(
        &mut self,
        position: usize,
        direction: SwipeDirection,
    ) -> ControllerResult<bool> {
        self.adapter
            .on_row_swiped(position, direction, &mut self.controller)
    }

    /// Positive dialog button.
    ///
    /// Validation failures are shown as a message and keep the dialog up.
    pub fn on_form_submitted(&mut self, input: ContactFields) -> Result<FormSubmission, FormError> {
        match self.form.submit(input, &mut self.controller) {
            Ok(submission) => {
                self.ui.dismiss_form();
                Ok(submission)
            }
            Err(err) => {
                if let FormError::Controller(inner) = &err {
                    error!("event=form_submit module=screen status=error error={inner}");
                }
                self.ui.show_message(&err.user_message());
                Err(err)
            }
        }
    }

    pub fn on_form_cancelled(&mut self) {
        if self.form.cancel().is_ok() {
            self.ui.dismiss_form();
        }
    }

    /// Applies completions that already arrived.
    pub fn pump(&mut self) -> Vec<ListEvent> {
        let events = self.controller.pump();
        self.publish(&events);
        events
    }

    /// Waits for all in-flight work, then publishes the result.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<ListEvent> {
        let events = self.controller.wait_idle(timeout);
        self.publish(&events);
        events
    }

    fn publish(&mut self, events: &[ListEvent]) {
        let mut replaced = false;
        for event in events {
            match event {
                ListEvent::Replaced { .. } => replaced = true,
                ListEvent::StoreFailed { operation, error } => {
                    warn!(
                        "event=store_failed module=screen status=error operation={operation:?} error={error}"
                    );
                }
                ListEvent::Added { .. }
                | ListEvent::Updated { .. }
                | ListEvent::Removed { .. } => {}
            }
        }
        if replaced {
            self.adapter
                .set_contacts(self.controller.contacts().to_vec(), &self.ui);
        }
    }
}
