use serde::{Deserialize, Serialize};

use crate::constants::sampler::{
    BOOST_KEYWORDS, CONTENT_BOOST_LIMIT, DEFAULT_ROW_CAP, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED,
    KEYWORD_BOOST_LIMIT, MIN_CONTENT_CHARS, SYNTHETIC_ROWS,
};
use crate::types::Keyword;

/// Top-level sampler configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Target number of rows in the output table (hard upper bound).
    pub sample_size: usize,
    /// Maximum number of source rows read from the input file.
    pub row_cap: usize,
    /// RNG seed for the stratified, uniform, and boost draws.
    pub seed: u64,
    /// Keywords matched case-insensitively as title substrings.
    pub keywords: Vec<Keyword>,
    /// Max extra rows drawn per keyword.
    pub keyword_boost_limit: usize,
    /// Abstracts must be strictly longer than this (in chars) to be boosted.
    pub min_content_chars: usize,
    /// Max extra rows drawn for substantial abstracts.
    pub content_boost_limit: usize,
    /// Number of synthetic rows appended as the final block.
    pub synthetic_rows: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            row_cap: DEFAULT_ROW_CAP,
            seed: DEFAULT_SEED,
            keywords: BOOST_KEYWORDS.iter().map(|kw| kw.to_string()).collect(),
            keyword_boost_limit: KEYWORD_BOOST_LIMIT,
            min_content_chars: MIN_CONTENT_CHARS,
            content_boost_limit: CONTENT_BOOST_LIMIT,
            synthetic_rows: SYNTHETIC_ROWS,
        }
    }
}

impl SamplerConfig {
    /// Config with defaults and an explicit sample size.
    pub fn with_sample_size(sample_size: usize) -> Self {
        Self {
            sample_size,
            ..Self::default()
        }
    }
}
