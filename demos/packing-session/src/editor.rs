//! Address edit dialog model.
//!
//! The dialog edits a local draft, not the session address: field changes
//! accumulate in the draft and only reach the session when the dialog is
//! confirmed. Cancelling drops the editor and with it every local edit.

use crate::actions::PackingAction;
use crate::types::Address;

/// Local editable copy of the session address.
///
/// Views own one of these while the dialog is open (the session state only
/// tracks the open/closed flag). Confirming yields the action that hands
/// the draft to the reducer; cancelling is simply dropping the editor.
///
/// # Example
///
/// ```
/// use packing_session::{AddressEditor, PackingAction, fixture};
///
/// let mut editor = AddressEditor::open(&fixture::default_address());
/// editor.draft_mut().city = "Hamburg".to_string();
///
/// let PackingAction::UpdateAddress(address) = editor.confirm() else {
///     return;
/// };
/// assert_eq!(address.city, "Hamburg");
/// ```
#[derive(Debug, Clone)]
pub struct AddressEditor {
    draft: Address,
}

impl AddressEditor {
    /// Open the dialog over the current session address
    #[must_use]
    pub fn open(address: &Address) -> Self {
        Self {
            draft: address.clone(),
        }
    }

    /// The draft as edited so far
    #[must_use]
    pub const fn draft(&self) -> &Address {
        &self.draft
    }

    /// Mutable access for field edits
    pub const fn draft_mut(&mut self) -> &mut Address {
        &mut self.draft
    }

    /// Confirm the dialog, handing the draft to the session
    #[must_use]
    pub fn confirm(self) -> PackingAction {
        PackingAction::UpdateAddress(self.draft)
    }
}
