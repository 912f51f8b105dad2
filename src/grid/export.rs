//! Export hooks for the data grid
//!
//! The grid only assembles the table; writing CSV or PDF is done by a
//! formatter the caller registers.

use anyhow::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn all() -> [ExportFormat; 2] {
        [ExportFormat::Csv, ExportFormat::Pdf]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "CSV"),
            ExportFormat::Pdf => write!(f, "PDF"),
        }
    }
}

/// Header/row pairs handed to a formatter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Turns an export table into a document
pub trait ExportFormatter {
    /// Write the table, returning a human readable description of the output
    /// (usually a file path)
    fn export(&mut self, table: &ExportTable) -> Result<String>;
}
