//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod column_filter_dialog;
pub mod columns;
pub mod columns_dialog;
pub mod confirm_delete_dialog;
pub mod dashboard;
pub mod detail;
pub mod export_dialog;
pub mod form_dialog;
pub mod grid_view;
pub mod help_dialog;
pub mod home;
pub mod layout;
pub mod quit_dialog;
pub mod setup;

pub use column_filter_dialog::ColumnFilterDialog;
pub use columns_dialog::ColumnsDialog;
pub use confirm_delete_dialog::ConfirmDeleteDialog;
pub use dashboard::DashboardComponent;
pub use detail::DetailComponent;
pub use export_dialog::ExportDialog;
pub use form_dialog::FormDialog;
pub use grid_view::{GridPanel, GridView};
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use setup::SetupComponent;
