//! Post-write diagnostics for sample files.
//!
//! Verification is advisory: it reports whether the basic statistics could be
//! computed, not whether the sample is statistically sound.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::data::RawTable;
use crate::errors::SamplerError;
use crate::schema::Field;
use crate::transport::csv::read_raw;
use crate::types::CellValue;

/// Statistics computed while verifying a sample table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Data rows.
    pub rows: usize,
    /// Header columns.
    pub columns: usize,
    /// Rough in-memory footprint: cell slots plus string payloads and headers.
    pub memory_bytes: usize,
    /// Rows with a null title.
    pub title_nulls: usize,
    /// Lexicographic (not chronological) minimum of publish_time.
    pub date_min: Option<String>,
    /// Lexicographic (not chronological) maximum of publish_time.
    pub date_max: Option<String>,
}

impl VerificationReport {
    /// `memory_bytes` in MiB.
    pub fn memory_mib(&self) -> f64 {
        self.memory_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Compute the verification statistics, failing if `title` or `publish_time` is absent.
pub fn inspect_sample(table: &RawTable) -> Result<VerificationReport, SamplerError> {
    let title_idx = required_column(table, Field::Title)?;
    let date_idx = required_column(table, Field::PublishTime)?;

    let mut memory_bytes: usize = table.headers.iter().map(String::len).sum();
    let mut title_nulls = 0;
    let mut date_min: Option<&str> = None;
    let mut date_max: Option<&str> = None;
    for row in &table.rows {
        memory_bytes += row.len() * size_of::<CellValue>();
        memory_bytes += row
            .iter()
            .map(|cell| cell.as_ref().map_or(0, String::len))
            .sum::<usize>();
        if cell_at(row, title_idx).is_none() {
            title_nulls += 1;
        }
        if let Some(date) = cell_at(row, date_idx) {
            date_min = Some(date_min.map_or(date, |current| current.min(date)));
            date_max = Some(date_max.map_or(date, |current| current.max(date)));
        }
    }
    Ok(VerificationReport {
        rows: table.rows.len(),
        columns: table.headers.len(),
        memory_bytes,
        title_nulls,
        date_min: date_min.map(str::to_string),
        date_max: date_max.map(str::to_string),
    })
}

/// Log verification statistics; true when every check ran.
pub fn verify_sample(table: &RawTable) -> bool {
    match inspect_sample(table) {
        Ok(report) => {
            log_report(&report);
            true
        }
        Err(err) => {
            warn!(error = %err, "sample verification failed");
            false
        }
    }
}

/// Read `path` and verify it; unreadable files report false.
pub fn verify_sample_file(path: &Path) -> bool {
    match read_raw(path, None) {
        Ok(table) => verify_sample(&table),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "sample verification failed");
            false
        }
    }
}

fn log_report(report: &VerificationReport) {
    info!(
        rows = report.rows,
        columns = report.columns,
        memory_mib = report.memory_mib(),
        title_nulls = report.title_nulls,
        date_min = report.date_min.as_deref().unwrap_or("n/a"),
        date_max = report.date_max.as_deref().unwrap_or("n/a"),
        "sample verification"
    );
}

fn required_column(table: &RawTable, field: Field) -> Result<usize, SamplerError> {
    table.column_index(field.column_name()).ok_or_else(|| {
        SamplerError::VerificationFailure(format!("missing column '{}'", field.column_name()))
    })
}

fn cell_at(row: &[CellValue], idx: usize) -> Option<&str> {
    row.get(idx).and_then(|cell| cell.as_deref())
}
