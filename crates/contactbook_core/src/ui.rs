//! Callback interface implemented by the platform UI framework.
//!
//! The core never renders; it only tells the UI what changed.

use crate::form::FormView;

pub trait ContactListUi {
    /// Every row may have changed; redraw the whole list.
    fn notify_data_set_changed(&self);

    /// Transient user-facing message (validation feedback).
    fn show_message(&self, _message: &str) {}

    /// Present the add/edit dialog described by `form`.
    fn show_form(&self, _form: &FormView) {}

    /// Close the add/edit dialog.
    fn dismiss_form(&self) {}
}
