#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command-line runners shared by the binaries.
pub mod apps;
/// Sampling configuration types.
pub mod config;
/// Centralized constants used across the sampler and runners.
pub mod constants;
/// Row and table types.
pub mod data;
/// Publish date parsing helpers.
pub mod dates;
/// Summary statistics for finished samples.
pub mod metrics;
/// Explicit random-generator handles.
pub mod rng;
/// Sampling pipeline and its individual steps.
pub mod sampler;
/// Known metadata fields and the load-time schema descriptor.
pub mod schema;
/// Synthetic augmentation and fallback rows.
pub mod synthetic;
/// Input/output transports (CSV today).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Post-write sample verification.
pub mod verify;

mod errors;

pub use config::SamplerConfig;
pub use data::{RawTable, Row, Table};
pub use errors::{SamplerError, StratificationFailure};
pub use metrics::{SampleSummary, YearShare, sample_summary, year_distribution};
pub use rng::{DeterministicRng, SamplerRngs};
pub use sampler::CorpusSampler;
pub use schema::{Column, Field, FieldKind, Schema};
pub use types::{CellValue, ColumnName, Keyword, PathString, Year};
pub use verify::{VerificationReport, inspect_sample, verify_sample, verify_sample_file};
