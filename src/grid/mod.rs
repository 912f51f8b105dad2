//! Tabular view engine
//!
//! A framework-independent data grid: column descriptors, view state and the
//! search/filter/sort/paginate pipeline. Rendering lives in
//! `components::grid_view`.

pub mod column;
pub mod engine;
pub mod export;
pub mod state;
pub mod value;

pub use column::{Align, Column};
pub use engine::{DataGrid, GridMode, GridRecord, ServerCallbacks};
pub use export::{ExportFormat, ExportFormatter, ExportTable};
pub use state::{GridQuery, SortDirection, SortSpec, ViewState, FILTER_ALL};
pub use value::CellValue;
