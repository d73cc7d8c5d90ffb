//! CSV table output writer.
//!
//! Tables are rendered in memory, staged as temporary files next to their
//! destination, and only moved into place once every table of a run has
//! been staged. A failure part-way leaves previous outputs untouched.

use csv::{ReaderBuilder, WriterBuilder};
use log::{debug, info};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::table::Table;
use crate::utils::error::OutputError;

/// Render a table as CSV bytes
///
/// Header row is the index column followed by the table's columns.
pub fn render_csv(table: &Table) -> Result<Vec<u8>, OutputError> {
    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new().from_writer(&mut buffer);

        writer.write_record(table.header())?;
        for row in &table.rows {
            writer.write_record(std::iter::once(&row.label).chain(row.cells.iter()))?;
        }
        writer.flush()?;
    }

    Ok(buffer)
}

/// Write several tables, all or nothing
///
/// **Public** - main entry point for table output
///
/// # Arguments
/// * `outputs` - (destination path, table) pairs
///
/// # Returns
/// The written paths, in input order
///
/// # Errors
/// * `OutputError::InvalidPath` - a destination is empty or a directory
/// * `OutputError::Csv` / `OutputError::WriteFailed` - rendering or staging failed
/// * `OutputError::PersistFailed` - a staged file could not be moved into place
pub fn write_tables(outputs: &[(PathBuf, &Table)]) -> Result<Vec<PathBuf>, OutputError> {
    // Stage everything first
    let mut staged = Vec::with_capacity(outputs.len());
    for (path, table) in outputs {
        validate_output_path(path)?;
        let bytes = render_csv(table)?;
        staged.push((path, stage_file(path, &bytes)?));
    }

    // Then move into place
    let mut written = Vec::with_capacity(staged.len());
    for (path, temp) in staged {
        temp.persist(path).map_err(|e| OutputError::PersistFailed {
            path: path.clone(),
            source: e.error,
        })?;
        info!("Table written to: {}", path.display());
        written.push(path.clone());
    }

    Ok(written)
}

/// Write a single table
pub fn write_table(table: &Table, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref().to_path_buf();
    write_tables(&[(output_path, table)])?;
    Ok(())
}

/// Read a table back from CSV
///
/// First column is taken as the row label.
pub fn read_table(input_path: impl AsRef<Path>) -> Result<Table, OutputError> {
    let input_path = input_path.as_ref();
    debug!("Reading table from: {}", input_path.display());

    let file = File::open(input_path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

    let columns = reader
        .headers()?
        .iter()
        .skip(1)
        .map(str::to_string)
        .collect();
    let mut table = Table::new(columns);

    for record in reader.records() {
        let record = record?;
        let mut fields = record.iter().map(str::to_string);
        let label = fields.next().unwrap_or_default();
        table.push_row(label, fields.collect());
    }

    Ok(table)
}

/// Write bytes to a temporary file beside `path`
///
/// **Private** - staging step of write_tables
fn stage_file(path: &Path, bytes: &[u8]) -> Result<NamedTempFile, OutputError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if !parent.exists() {
        debug!("Creating parent directories: {}", parent.display());
        fs::create_dir_all(&parent).map_err(|e| {
            OutputError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
        })?;
    }

    let mut temp = NamedTempFile::new_in(&parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    Ok(temp)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
