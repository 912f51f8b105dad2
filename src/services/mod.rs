//! Background work and side effects
//!
//! - Backend requests on worker threads
//! - Writing exports to disk

pub mod export;
pub mod requests;

pub use export::{default_export_dir, CsvFileExporter};
pub use requests::{Completed, Payload, Request, RequestRunner};
