use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::constants::apps::SUMMARY_YEAR_PROBE;
use crate::data::Table;
use crate::dates::publish_year;
use crate::schema::Field;
use crate::types::Year;

/// Descriptive statistics for a finished sample.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleSummary {
    /// Total rows, synthetic included.
    pub rows: usize,
    /// Output columns.
    pub columns: usize,
    /// Rows with a non-null abstract.
    pub abstracts_present: usize,
    /// Distinct non-null journal names.
    pub unique_journals: usize,
    /// Rows whose raw publish_time contains `2020`.
    pub rows_mentioning_2020: usize,
    /// Lexicographic minimum of publish_time.
    pub date_min: Option<String>,
    /// Lexicographic maximum of publish_time.
    pub date_max: Option<String>,
    /// Parseable dates per year, ascending.
    pub per_year: Vec<YearShare>,
}

/// Share of a table's parseable dates falling into one year.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearShare {
    /// Publish year.
    pub year: Year,
    /// Rows dated in `year`.
    pub count: usize,
    /// `count` over all dated rows, in `[0, 1]`.
    pub share: f64,
}

/// Count rows per publish year; null or unparseable dates are skipped.
pub fn year_distribution(table: &Table) -> BTreeMap<Year, usize> {
    let mut counts = BTreeMap::new();
    for row in table.rows() {
        if let Some(year) = table.value(row, Field::PublishTime).and_then(publish_year) {
            *counts.entry(year).or_insert(0) += 1;
        }
    }
    counts
}

/// Per-year shares in ascending year order.
pub fn year_shares(counts: &BTreeMap<Year, usize>) -> Vec<YearShare> {
    let total: usize = counts.values().sum();
    counts
        .iter()
        .map(|(year, count)| YearShare {
            year: *year,
            count: *count,
            share: if total == 0 {
                0.0
            } else {
                *count as f64 / total as f64
            },
        })
        .collect()
}

/// Summarize a finished sample for the runner's report.
pub fn sample_summary(table: &Table) -> SampleSummary {
    let mut abstracts_present = 0;
    let mut journals = HashSet::new();
    let mut rows_mentioning_2020 = 0;
    let mut date_min: Option<&str> = None;
    let mut date_max: Option<&str> = None;
    for row in table.rows() {
        if table.value(row, Field::Abstract).is_some() {
            abstracts_present += 1;
        }
        if let Some(journal) = table.value(row, Field::Journal) {
            journals.insert(journal);
        }
        if let Some(date) = table.value(row, Field::PublishTime) {
            if date.contains(SUMMARY_YEAR_PROBE) {
                rows_mentioning_2020 += 1;
            }
            date_min = Some(date_min.map_or(date, |current| current.min(date)));
            date_max = Some(date_max.map_or(date, |current| current.max(date)));
        }
    }
    SampleSummary {
        rows: table.len(),
        columns: table.schema().len(),
        abstracts_present,
        unique_journals: journals.len(),
        rows_mentioning_2020,
        date_min: date_min.map(str::to_string),
        date_max: date_max.map(str::to_string),
        per_year: year_shares(&year_distribution(table)),
    }
}
