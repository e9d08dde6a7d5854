use thiserror::Error;

use crate::types::{LogMessage, PathString};

/// Error type for reading, stratifying, verifying, and persisting sample tables.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// The source table could not be loaded or has an unusable shape.
    #[error("source '{source_id}' could not be read: {reason}")]
    ReadFailure {
        /// Path or label of the source.
        source_id: PathString,
        /// Underlying cause.
        reason: LogMessage,
    },
    /// A sample table lacks what verification needs.
    #[error("verification failed: {0}")]
    VerificationFailure(LogMessage),
    /// The output file could not be written.
    #[error("failed to write '{path}': {reason}")]
    WriteFailure {
        /// Destination path.
        path: PathString,
        /// Underlying cause.
        reason: LogMessage,
    },
}

impl SamplerError {
    pub(crate) fn read(source_id: impl Into<PathString>, reason: impl ToString) -> Self {
        Self::ReadFailure {
            source_id: source_id.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathString>, reason: impl ToString) -> Self {
        Self::WriteFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True when the error should route sampling to the synthetic fallback table.
    pub fn triggers_fallback(&self) -> bool {
        matches!(self, Self::ReadFailure { .. })
    }
}

/// Distinct stratification failure points.
///
/// Date extraction (`MissingDateField`, `UnparseableDate`) fails before any draw
/// happens; `EmptySource` is raised by the draw itself. Callers degrade to a
/// uniform sample, so these never surface as a [`SamplerError`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StratificationFailure {
    /// The schema has no date column.
    #[error("table has no publish date column")]
    MissingDateField,
    /// A row's date is null or matches no known format.
    #[error("row {row} has an unparseable publish date {value:?}")]
    UnparseableDate {
        /// Row index in the source table.
        row: usize,
        /// Raw cell value; `None` when null.
        value: Option<String>,
    },
    /// No rows to draw from.
    #[error("cannot draw strata from an empty table")]
    EmptySource,
}
