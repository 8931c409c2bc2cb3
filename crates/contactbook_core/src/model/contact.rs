//! Contact record and field payloads.
//!
//! # Responsibility
//! - Define the persisted `Contact` shape and its editable `ContactFields`.
//! - Enforce the non-empty rule at the persistence boundary.
//!
//! # Invariants
//! - `id == NEW_CONTACT_ID` means "not yet stored"; the store assigns ids.
//! - Field order for validation is first name, last name, email, phone.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned identifier (SQLite rowid).
pub type ContactId = i64;

/// Identifier carried by contacts that were never persisted.
pub const NEW_CONTACT_ID: ContactId = 0;

/// One required text field of a contact, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactField {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
}

impl ContactField {
    /// All fields in the fixed validation order.
    pub const ORDERED: [ContactField; 4] = [
        ContactField::FirstName,
        ContactField::LastName,
        ContactField::Email,
        ContactField::PhoneNumber,
    ];

    /// Database column / wire name.
    pub fn column(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::PhoneNumber => "phone_number",
        }
    }
}

/// Editable part of a contact: what the form collects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl ContactFields {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone_number: phone_number.into(),
        }
    }

    /// Returns the value of one field.
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::FirstName => &self.first_name,
            ContactField::LastName => &self.last_name,
            ContactField::Email => &self.email,
            ContactField::PhoneNumber => &self.phone_number,
        }
    }

    /// Returns the first empty field in validation order, if any.
    ///
    /// Only zero-length values count as empty; whitespace is kept as typed.
    pub fn first_missing(&self) -> Option<ContactField> {
        ContactField::ORDERED
            .into_iter()
            .find(|field| self.get(*field).is_empty())
    }
}

/// Validation error raised before a contact reaches SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactValidationError {
    EmptyField(ContactField),
}

impl Display for ContactValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "contact field `{}` is empty", field.column()),
        }
    }
}

impl Error for ContactValidationError {}

/// Persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// `NEW_CONTACT_ID` until the store assigns a durable id.
    pub id: ContactId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl Contact {
    /// Creates an unsaved contact (`id == NEW_CONTACT_ID`).
    pub fn new(fields: ContactFields) -> Self {
        Self::with_id(NEW_CONTACT_ID, fields)
    }

    /// Creates a contact with a known identifier.
    pub fn with_id(id: ContactId, fields: ContactFields) -> Self {
        Self {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            phone_number: fields.phone_number,
        }
    }

    /// Whether the store has not assigned an id yet.
    pub fn is_new(&self) -> bool {
        self.id == NEW_CONTACT_ID
    }

    /// Copies the editable fields out of this record.
    pub fn fields(&self) -> ContactFields {
        ContactFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone_number: self.phone_number.clone(),
        }
    }

    /// Replaces all editable fields, keeping the identifier.
    pub fn apply(&mut self, fields: ContactFields) {
        self.first_name = fields.first_name;
        self.last_name = fields.last_name;
        self.email = fields.email;
        self.phone_number = fields.phone_number;
    }

    /// "First Last" as shown in list rows.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Checks that every required field is non-empty.
    pub fn validate(&self) -> Result<(), ContactValidationError> {
        match self.fields().first_missing() {
            Some(field) => Err(ContactValidationError::EmptyField(field)),
            None => Ok(()),
        }
    }
}
