/// Constants used by the sampling pipeline defaults.
pub mod sampler {
    /// Default number of rows in the output table.
    pub const DEFAULT_SAMPLE_SIZE: usize = 10_000;
    /// Maximum number of source rows read from the input file.
    pub const DEFAULT_ROW_CAP: usize = 50_000;
    /// Seed used for the deterministic sampling draws.
    pub const DEFAULT_SEED: u64 = 42;
    /// Topic keywords matched case-insensitively against titles.
    pub const BOOST_KEYWORDS: [&str; 4] = ["covid", "sars-cov-2", "coronavirus", "pandemic"];
    /// Maximum number of extra rows drawn per keyword.
    pub const KEYWORD_BOOST_LIMIT: usize = 50;
    /// Abstracts must be strictly longer than this many characters to count as substantial.
    pub const MIN_CONTENT_CHARS: usize = 100;
    /// Maximum number of extra rows drawn for the content boost.
    pub const CONTENT_BOOST_LIMIT: usize = 1_000;
    /// Number of synthetic rows appended as the final block.
    pub const SYNTHETIC_ROWS: usize = 100;
}

/// Constants used by synthetic row generation.
pub mod synthetic {
    /// Journals used by augmentation rows.
    pub const AUGMENT_JOURNALS: [&str; 5] = ["Nature Medicine", "Science", "The Lancet", "BMJ", "JAMA"];
    /// Years used by augmentation rows.
    pub const AUGMENT_YEARS: [i32; 3] = [2020, 2021, 2022];
    /// Journals used by fallback rows.
    pub const FALLBACK_JOURNALS: [&str; 10] = [
        "Nature Medicine",
        "Science",
        "The Lancet",
        "BMJ",
        "JAMA",
        "NEJM",
        "PLOS ONE",
        "Cell",
        "Nature",
        "Science Translational Medicine",
    ];
    /// Years used by fallback rows.
    pub const FALLBACK_YEARS: [i32; 4] = [2019, 2020, 2021, 2022];
    /// Research topics used for fallback titles and abstracts.
    pub const RESEARCH_TOPICS: [&str; 10] = [
        "COVID-19 Treatment and Vaccine Development",
        "SARS-CoV-2 Transmission Dynamics",
        "Pandemic Response Strategies",
        "Clinical Outcomes and Risk Factors",
        "Public Health Interventions",
        "Viral Genomics and Evolution",
        "Healthcare System Preparedness",
        "Social and Economic Impacts",
        "Diagnostic Testing Methods",
        "Therapeutic Interventions",
    ];
    /// Size of the `Researcher N` author pool used by fallback rows.
    pub const AUTHOR_POOL_SIZE: usize = 100;
    /// Maximum number of authors on a fallback row.
    pub const MAX_AUTHORS: usize = 5;
    /// Probability that a fallback row carries `pdf_json_files`.
    pub const PDF_PRESENT_PROBABILITY: f64 = 0.7;
    /// Probability that a fallback row carries `pmc_json_files`.
    pub const PMC_PRESENT_PROBABILITY: f64 = 0.5;
    /// Probability that a fallback row carries `who_covidence_id`.
    pub const WHO_ID_PRESENT_PROBABILITY: f64 = 0.3;
    /// Base URL for synthetic paper links.
    pub const SYNTHETIC_URL_BASE: &str = "https://example.com";
    /// Separator between author names.
    pub const AUTHOR_SEPARATOR: &str = "; ";
}

/// Constants used by the command-line runners.
pub mod apps {
    /// Default input CSV path.
    pub const DEFAULT_INPUT_PATH: &str = "data/metadata.csv";
    /// Default output CSV path.
    pub const DEFAULT_OUTPUT_PATH: &str = "data/metadata_sample.csv";
    /// Substring counted by the summary's year probe.
    pub const SUMMARY_YEAR_PROBE: &str = "2020";
}
