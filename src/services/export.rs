//! Export formatters that write grid tables to disk

use crate::grid::{ExportFormatter, ExportTable};
use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes tables as `<resource>-<timestamp>.csv` into a directory
pub struct CsvFileExporter {
    dir: PathBuf,
    resource: String,
}

impl CsvFileExporter {
    pub fn new(dir: impl Into<PathBuf>, resource: &str) -> Self {
        Self {
            dir: dir.into(),
            resource: file_stem(resource),
        }
    }

    /// Next free file name for this resource
    fn target_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let base = format!("{}-{}", self.resource, stamp);
        let mut path = self.dir.join(format!("{}.csv", base));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{}-{}.csv", base, n));
            n += 1;
        }
        path
    }
}

impl ExportFormatter for CsvFileExporter {
    fn export(&mut self, table: &ExportTable) -> Result<String> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Could not create {}", self.dir.display()))?;

        let path = self.target_path();
        let file = fs::File::create(&path)
            .with_context(|| format!("Could not create {}", path.display()))?;
        write_csv(file, table)?;

        info!("Exported {} rows to {}", table.rows.len(), path.display());
        Ok(path.display().to_string())
    }
}

/// Header line followed by one record per row
pub fn write_csv<W: Write>(writer: W, table: &ExportTable) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(&table.headers)?;
    for row in &table.rows {
        csv.write_record(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Lower-case, file-system safe version of a resource name
fn file_stem(resource: &str) -> String {
    let stem: String = resource
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let stem = stem.trim_matches('-').to_string();
    if stem.is_empty() {
        "export".to_string()
    } else {
        stem
    }
}

/// `~/uem-console-exports`, or the working directory when HOME is unset
pub fn default_export_dir() -> PathBuf {
    std::env::var("HOME")
        .map(|home| Path::new(&home).join("uem-console-exports"))
        .unwrap_or_else(|_| PathBuf::from("."))
}
