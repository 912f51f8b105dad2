//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::grid::ExportFormat;
use crate::model::ui::Tab;
use crate::model::FormField;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background requests and expiring notifications
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next row
    NextItem,
    /// Move to previous row
    PrevItem,
    /// Jump to first row of the page
    FirstItem,
    /// Jump to last row of the page
    LastItem,
    /// Move to next resource tab
    NextTab,
    /// Move to previous resource tab
    PrevTab,
    /// Jump straight to a tab
    SelectTab(Tab),
    /// Switch platform-scoped tabs to the next platform
    NextPlatform,
    /// Switch platform-scoped tabs to the previous platform
    PrevPlatform,

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll detail panel down one line
    ScrollDetailDown,
    /// Scroll detail panel up one line
    ScrollDetailUp,

    // ─────────────────────────────────────────────────────────────────────────
    // Grid
    // ─────────────────────────────────────────────────────────────────────────
    /// Move column focus right
    FocusNextColumn,
    /// Move column focus left
    FocusPrevColumn,
    /// Sort by the focused column (again to flip direction)
    SortFocused,
    /// Drop the sort
    ClearSort,
    NextPage,
    PrevPage,
    GrowPageSize,
    ShrinkPageSize,
    /// Widen the focused column by one cell
    WidenColumn,
    /// Narrow the focused column by one cell
    NarrowColumn,
    /// Open the column filter dialog
    OpenColumnFilter,
    /// Apply an equality filter ("all" clears it)
    SetColumnFilter { column: String, value: String },
    ClearFilters,
    /// Open the column visibility dialog
    OpenColumnVisibility,
    /// Show/hide a column
    ToggleColumn(String),
    /// The devices grid asked for a new server page
    LoadDevicePage,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    /// Enter search mode
    EnterSearchMode,
    /// Exit search mode
    ExitSearchMode,
    /// Add character to search query
    SearchInput(char),
    /// Remove last character from search query
    SearchBackspace,
    /// Clear the search query
    ClearSearch,

    // ─────────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────────
    /// Reload the active tab from the backend
    Reload,
    /// Open the create form for the active tab
    OpenNewRecord,
    /// Open the edit form for the selected profile
    OpenEditProfile,
    /// Ask before deleting the selected record
    OpenDeleteConfirm,
    /// Submit the open form
    SubmitForm(Vec<FormField>),

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────
    /// Open export format picker
    OpenExport,
    /// Export the active grid
    Export(ExportFormat),

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,

    // ─────────────────────────────────────────────────────────────────────────
    // Mouse
    // ─────────────────────────────────────────────────────────────────────────
    /// Left button pressed at (column, row)
    MouseDown(u16, u16),
    /// Pointer dragged to column
    MouseDrag(u16),
    /// Left button released
    MouseUp,

    // ─────────────────────────────────────────────────────────────────────────
    // Setup Wizard
    // ─────────────────────────────────────────────────────────────────────────
    /// Confirm setup configuration
    SetupConfirm,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::SelectTab(tab) => write!(f, "SelectTab({})", tab.name()),
            Action::NextPlatform => write!(f, "NextPlatform"),
            Action::PrevPlatform => write!(f, "PrevPlatform"),
            Action::ScrollDetailDown => write!(f, "ScrollDetailDown"),
            Action::ScrollDetailUp => write!(f, "ScrollDetailUp"),
            Action::FocusNextColumn => write!(f, "FocusNextColumn"),
            Action::FocusPrevColumn => write!(f, "FocusPrevColumn"),
            Action::SortFocused => write!(f, "SortFocused"),
            Action::ClearSort => write!(f, "ClearSort"),
            Action::NextPage => write!(f, "NextPage"),
            Action::PrevPage => write!(f, "PrevPage"),
            Action::GrowPageSize => write!(f, "GrowPageSize"),
            Action::ShrinkPageSize => write!(f, "ShrinkPageSize"),
            Action::WidenColumn => write!(f, "WidenColumn"),
            Action::NarrowColumn => write!(f, "NarrowColumn"),
            Action::OpenColumnFilter => write!(f, "OpenColumnFilter"),
            Action::SetColumnFilter { column, value } => {
                write!(f, "SetColumnFilter({}={})", column, value)
            }
            Action::ClearFilters => write!(f, "ClearFilters"),
            Action::OpenColumnVisibility => write!(f, "OpenColumnVisibility"),
            Action::ToggleColumn(key) => write!(f, "ToggleColumn({})", key),
            Action::LoadDevicePage => write!(f, "LoadDevicePage"),
            Action::EnterSearchMode => write!(f, "EnterSearchMode"),
            Action::ExitSearchMode => write!(f, "ExitSearchMode"),
            Action::SearchInput(c) => write!(f, "SearchInput('{}')", c),
            Action::SearchBackspace => write!(f, "SearchBackspace"),
            Action::ClearSearch => write!(f, "ClearSearch"),
            Action::Reload => write!(f, "Reload"),
            Action::OpenNewRecord => write!(f, "OpenNewRecord"),
            Action::OpenEditProfile => write!(f, "OpenEditProfile"),
            Action::OpenDeleteConfirm => write!(f, "OpenDeleteConfirm"),
            Action::SubmitForm(fields) => write!(f, "SubmitForm({} fields)", fields.len()),
            Action::OpenExport => write!(f, "OpenExport"),
            Action::Export(format) => write!(f, "Export({})", format),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::MouseDown(x, y) => write!(f, "MouseDown({}, {})", x, y),
            Action::MouseDrag(x) => write!(f, "MouseDrag({})", x),
            Action::MouseUp => write!(f, "MouseUp"),
            Action::SetupConfirm => write!(f, "SetupConfirm"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Action::Export(ExportFormat::Csv).to_string(), "Export(CSV)");
        assert_eq!(
            Action::SetColumnFilter {
                column: "status".to_string(),
                value: "online".to_string()
            }
            .to_string(),
            "SetColumnFilter(status=online)"
        );
    }
}
