//! Add/edit form coordinator.
//!
//! # Responsibility
//! - Describe the dialog for the two entry modes (add, edit).
//! - Validate submitted input and hand it to the list controller.
//!
//! # Invariants
//! - Fields are checked first name, last name, email, phone number; only the
//!   first empty one is reported.
//! - A failed submit leaves the form open with its mode untouched.
//! - The dialog is never cancelable by an outside tap.

use crate::controller::{ContactListController, ControllerError};
use crate::model::contact::{Contact, ContactField, ContactFields};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const ADD_TITLE: &str = "Add Contact";
pub const EDIT_TITLE: &str = "Edit Contact";
pub const ADD_BUTTON_LABEL: &str = "Save";
pub const EDIT_BUTTON_LABEL: &str = "Update";

/// User-facing message for an empty required field.
pub fn missing_field_message(field: ContactField) -> &'static str {
    match field {
        ContactField::FirstName => "Enter first name",
        ContactField::LastName => "Enter last name",
        ContactField::Email => "Enter email",
        ContactField::PhoneNumber => "Enter phone number",
    }
}

/// Checks `input` in the fixed field order.
pub fn validate_fields(input: &ContactFields) -> Result<(), FormError> {
    match input.first_missing() {
        Some(field) => Err(FormError::MissingField(field)),
        None => Ok(()),
    }
}

#[derive(Debug)]
pub enum FormError {
    MissingField(ContactField),
    /// Submit or cancel arrived while no form was open.
    NotOpen,
    Controller(ControllerError),
}

impl FormError {
    /// Message suitable for a transient toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingField(field) => missing_field_message(*field).to_string(),
            other => other.to_string(),
        }
    }
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => f.write_str(missing_field_message(*field)),
            Self::NotOpen => f.write_str("no contact form is open"),
            Self::Controller(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FormError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Controller(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ControllerError> for FormError {
    fn from(value: ControllerError) -> Self {
        Self::Controller(value)
    }
}

/// Which flow the open form belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Add,
    /// `position` is the row index at the time the form was opened.
    Edit { contact: Contact, position: usize },
}

/// What the UI needs to present the dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub positive_label: &'static str,
    /// Prefilled values; blank in add mode.
    pub fields: ContactFields,
    pub cancelable: bool,
}

/// Successful submission result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSubmission {
    Added,
    Updated { position: usize },
}

#[derive(Debug, Default)]
pub struct EditFormCoordinator {
    mode: Option<FormMode>,
}

impl EditFormCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Option<&FormMode> {
        self.mode.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    /// Opens a blank form. Replaces any form already open.
    pub fn open_add(&mut self) -> FormView {
        self.mode = Some(FormMode::Add);
        FormView {
            title: ADD_TITLE,
            positive_label: ADD_BUTTON_LABEL,
            fields: ContactFields::default(),
            cancelable: false,
        }
    }

    /// Opens a form prefilled from `contact`, remembering its row position.
    pub fn open_edit(&mut self, contact: Contact, position: usize) -> FormView {
        let fields = contact.fields();
        self.mode = Some(FormMode::Edit { contact, position });
        FormView {
            title: EDIT_TITLE,
            positive_label: EDIT_BUTTON_LABEL,
            fields,
            cancelable: false,
        }
    }

    /// Closes the form without submitting.
    pub fn cancel(&mut self) -> Result<(), FormError> {
        self.mode.take().map(|_| ()).ok_or(FormError::NotOpen)
    }

    /// Validates `input` and submits it through `controller`.
    ///
    /// On success the form closes. On any error the form stays open.
    pub fn submit(
        &mut self,
        input: ContactFields,
        controller: &mut ContactListController,
    ) -> Result<FormSubmission, FormError> {
        let Some(mode) = self.mode.as_ref() else {
            return Err(FormError::NotOpen);
        };
        validate_fields(&input)?;

        let submission = match mode {
            FormMode::Add => {
                controller.add(input)?;
                FormSubmission::Added
            }
            FormMode::Edit { position, .. } => {
                let position = *position;
                controller.update(input, position)?;
                FormSubmission::Updated { position }
            }
        };

        self.mode = None;
        info!("event=form_submit module=form status=ok submission={submission:?}");
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        validate_fields, EditFormCoordinator, FormError, FormMode, ADD_BUTTON_LABEL, ADD_TITLE,
        EDIT_BUTTON_LABEL,
    };
    use crate::controller::ContactListController;
    use crate::model::contact::{Contact, ContactField, ContactFields};
    use crate::store::ContactStore;

    #[test]
    fn validation_reports_only_the_first_missing_field() {
        let all_empty = ContactFields::default();
        let err = validate_fields(&all_empty).unwrap_err();
        assert_eq!(err.user_message(), "Enter first name");

        let no_email = ContactFields::new("Ada", "Lovelace", "", "");
        let err = validate_fields(&no_email).unwrap_err();
        assert!(matches!(err, FormError::MissingField(ContactField::Email)));
        assert_eq!(err.to_string(), "Enter email");

        let no_phone = ContactFields::new("Ada", "Lovelace", "ada@example.com", "");
        assert_eq!(
            validate_fields(&no_phone).unwrap_err().user_message(),
            "Enter phone number"
        );

        let no_last = ContactFields::new("Ada", "", "ada@example.com", "5550100");
        assert_eq!(
            validate_fields(&no_last).unwrap_err().user_message(),
            "Enter last name"
        );
    }

    #[test]
    fn add_form_is_blank_and_not_cancelable() {
        let mut form = EditFormCoordinator::new();
        let view = form.open_add();
        assert_eq!(view.title, ADD_TITLE);
        assert_eq!(view.positive_label, ADD_BUTTON_LABEL);
        assert_eq!(view.fields, ContactFields::default());
        assert!(!view.cancelable);
        assert_eq!(form.mode(), Some(&FormMode::Add));
    }

    #[test]
    fn edit_form_is_prefilled() {
        let mut form = EditFormCoordinator::new();
        let contact = Contact::with_id(
            3,
            ContactFields::new("Ada", "Lovelace", "ada@example.com", "5550100"),
        );
        let view = form.open_edit(contact.clone(), 4);
        assert_eq!(view.positive_label, EDIT_BUTTON_LABEL);
        assert_eq!(view.fields, contact.fields());
    }

    #[test]
    fn failed_submit_keeps_form_open() {
        let mut controller = ContactListController::new(ContactStore::open_in_memory().unwrap());
        let mut form = EditFormCoordinator::new();
        form.open_add();

        let err = form
            .submit(ContactFields::new("", "Lovelace", "", ""), &mut controller)
            .unwrap_err();

        assert_eq!(err.user_message(), "Enter first name");
        assert!(form.is_open());
        assert_eq!(controller.in_flight(), 0);
    }

    #[test]
    fn submit_and_cancel_without_open_form_fail() {
        let mut controller = ContactListController::new(ContactStore::open_in_memory().unwrap());
        let mut form = EditFormCoordinator::new();

        assert!(matches!(
            form.submit(ContactFields::default(), &mut controller),
            Err(FormError::NotOpen)
        ));
        assert!(matches!(form.cancel(), Err(FormError::NotOpen)));

        form.open_add();
        form.cancel().unwrap();
        assert!(!form.is_open());
    }
}
