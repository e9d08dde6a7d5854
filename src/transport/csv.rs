use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::data::{RawTable, Table};
use crate::errors::SamplerError;
use crate::types::{CellValue, PathString};

/// Read a CSV file with a header row into an untyped table.
///
/// Empty cells become nulls and short rows are padded with nulls. Rows with
/// more cells than the header, missing files, and malformed CSV are read
/// failures. At most `row_cap` data rows are read when a cap is given.
pub fn read_raw(path: &Path, row_cap: Option<usize>) -> Result<RawTable, SamplerError> {
    let source_id = path_string(path);
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|err| SamplerError::read(&source_id, err))?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| SamplerError::read(&source_id, err))?
        .iter()
        .map(|header| header.trim().to_string())
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(SamplerError::read(&source_id, "file has no header row"));
    }

    let limit = row_cap.unwrap_or(usize::MAX);
    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while rows.len() < limit {
        let has_record = reader
            .read_record(&mut record)
            .map_err(|err| SamplerError::read(&source_id, err))?;
        if !has_record {
            break;
        }
        if record.len() > headers.len() {
            return Err(SamplerError::read(
                &source_id,
                format!(
                    "line {} has {} fields, expected at most {}",
                    record.position().map(|pos| pos.line()).unwrap_or_default(),
                    record.len(),
                    headers.len()
                ),
            ));
        }
        let mut cells: Vec<CellValue> = record
            .iter()
            .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
            .collect();
        cells.resize(headers.len(), None);
        rows.push(cells);
    }
    Ok(RawTable { headers, rows })
}

/// Read and schema-validate a metadata table.
pub fn read_table(path: &Path, row_cap: Option<usize>) -> Result<Table, SamplerError> {
    let source_id = path_string(path);
    let table = read_raw(path, row_cap)?.into_table(&source_id)?;
    info!(
        path = %source_id,
        rows = table.len(),
        columns = table.schema().len(),
        "loaded source table"
    );
    Ok(table)
}

/// Write `table` as CSV with a header row, creating parent directories.
pub fn write_table(path: &Path, table: &Table) -> Result<(), SamplerError> {
    write_raw(path, &table.to_raw())
}

/// Write an untyped table as CSV with a header row; nulls are written as empty cells.
pub fn write_raw(path: &Path, table: &RawTable) -> Result<(), SamplerError> {
    let target = path_string(path);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| SamplerError::write(&target, err))?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| SamplerError::write(&target, err))?;
    writer
        .write_record(&table.headers)
        .map_err(|err| SamplerError::write(&target, err))?;
    for row in &table.rows {
        writer
            .write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))
            .map_err(|err| SamplerError::write(&target, err))?;
    }
    writer
        .flush()
        .map_err(|err| SamplerError::write(&target, err))?;
    info!(path = %target, rows = table.rows.len(), "wrote table");
    Ok(())
}

fn path_string(path: &Path) -> PathString {
    path.to_string_lossy().into_owned()
}
