//! Modal stack for managing overlays
//!
//! Only the top modal receives input; modals are drawn bottom to top.

use super::ui::Tab;

/// What a form dialog creates or edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPurpose {
    NewGroup,
    NewGeofence,
    NewRepository,
    EditProfile { id: String },
}

impl FormPurpose {
    pub fn title(&self) -> &str {
        match self {
            FormPurpose::NewGroup => "New Device Group",
            FormPurpose::NewGeofence => "New Geofence",
            FormPurpose::NewRepository => "New Repository",
            FormPurpose::EditProfile { .. } => "Edit Profile",
        }
    }
}

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Keyboard shortcuts
    Help,
    /// Pick a column, then a value to filter it by
    ColumnFilter,
    /// Show/hide columns of the active grid
    ColumnVisibility,
    /// Choose an export format
    Export,
    /// Create or edit a record
    Form { purpose: FormPurpose },
    /// Confirm deletion of a record
    ConfirmDelete { tab: Tab, id: String, name: String },
}

/// A stack of modal overlays
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Close every modal
    pub fn clear(&mut self) {
        self.stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::ColumnFilter);
        stack.push(Modal::QuitConfirm);
        assert_eq!(stack.top(), Some(&Modal::QuitConfirm));

        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert_eq!(stack.pop(), Some(Modal::ColumnFilter));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_clear_and_form_titles() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Form {
            purpose: FormPurpose::EditProfile { id: "p1".to_string() },
        });
        stack.push(Modal::Help);
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(FormPurpose::NewGeofence.title(), "New Geofence");
    }
}
