//! Synthetic metadata rows: the augmentation block appended to every sample
//! and the full replacement table used when the source cannot be read.

use rand::seq::index;
use rand::{Rng, RngCore};

use crate::constants::synthetic::{
    AUGMENT_JOURNALS, AUGMENT_YEARS, AUTHOR_POOL_SIZE, AUTHOR_SEPARATOR, FALLBACK_JOURNALS,
    FALLBACK_YEARS, MAX_AUTHORS, PDF_PRESENT_PROBABILITY, PMC_PRESENT_PROBABILITY,
    RESEARCH_TOPICS, SYNTHETIC_URL_BASE, WHO_ID_PRESENT_PROBABILITY,
};
use crate::data::{Row, Table};
use crate::schema::{Field, Schema};
use crate::types::CellValue;

const AUGMENT_ABSTRACT: &str = "This is a synthetic abstract for testing purposes. It discusses COVID-19 treatment options and prevention strategies. This paper was generated for the sample dataset.";

/// Augmentation rows for `schema`, with identifiers `synth_0000`, `synth_0001`, ...
///
/// Every known field is populated; passthrough columns are left null.
pub fn augmentation_rows(schema: &Schema, count: usize, rng: &mut dyn RngCore) -> Vec<Row> {
    (0..count)
        .map(|idx| {
            let publish_time = random_date(rng, &AUGMENT_YEARS);
            let journal = *pick(&AUGMENT_JOURNALS, rng);
            let values = schema
                .columns()
                .iter()
                .map(|column| {
                    let field = column.field()?;
                    Some(match field {
                        Field::CordUid => format!("synth_{idx:04}"),
                        Field::Title => format!(
                            "Synthetic COVID-19 Research Paper {idx} on Treatment and Prevention"
                        ),
                        Field::Abstract => AUGMENT_ABSTRACT.to_string(),
                        Field::PublishTime => publish_time.clone(),
                        Field::Authors => {
                            format!("Researcher {idx}; Co-Author {idx}; Team Member {idx}")
                        }
                        Field::Journal => journal.to_string(),
                        Field::Url => format!("{SYNTHETIC_URL_BASE}/synthetic/{idx}"),
                        Field::PdfJsonFiles => format!("pdf_synth_{idx:04}.json"),
                        Field::PmcJsonFiles => format!("pmc_synth_{idx:04}.json"),
                        Field::WhoCovidenceId => format!("WHO_COV_{idx:04}"),
                    })
                })
                .collect();
            Row::new(values)
        })
        .collect()
}

/// Replacement table of exactly `sample_size` rows over the full schema.
///
/// All fields are populated except `pdf_json_files`, `pmc_json_files`, and
/// `who_covidence_id`, which are present with probability 0.7, 0.5, and 0.3.
pub fn fallback_table(sample_size: usize, rng: &mut dyn RngCore) -> Table {
    let schema = Schema::full();
    let rows: Vec<Row> = (0..sample_size)
        .map(|idx| {
            let values: Vec<CellValue> = Field::ALL
                .into_iter()
                .map(|field| fallback_value(field, idx, rng))
                .collect();
            Row::new(values)
        })
        .collect();
    Table::from_aligned(schema, rows)
}

fn fallback_value(field: Field, idx: usize, rng: &mut dyn RngCore) -> CellValue {
    match field {
        Field::CordUid => Some(format!("uid{idx:06}")),
        Field::Title => Some(format!("{}: A Comprehensive Study", pick(&RESEARCH_TOPICS, rng))),
        Field::Abstract => Some(format!(
            "This study examines {}. Our findings suggest important implications for public health and clinical practice. The research was conducted during the COVID-19 pandemic and provides valuable insights.",
            pick(&RESEARCH_TOPICS, rng).to_lowercase()
        )),
        Field::PublishTime => Some(random_date(rng, &FALLBACK_YEARS)),
        Field::Authors => Some(random_authors(rng)),
        Field::Journal => Some(pick(&FALLBACK_JOURNALS, rng).to_string()),
        Field::Url => Some(format!("{SYNTHETIC_URL_BASE}/paper/{idx}")),
        Field::PdfJsonFiles => rng
            .random_bool(PDF_PRESENT_PROBABILITY)
            .then(|| format!("pdf{idx:06}.json")),
        Field::PmcJsonFiles => rng
            .random_bool(PMC_PRESENT_PROBABILITY)
            .then(|| format!("pmc{idx:06}.json")),
        Field::WhoCovidenceId => rng
            .random_bool(WHO_ID_PRESENT_PROBABILITY)
            .then(|| format!("WHO_COV_{idx:06}")),
    }
}

/// `YYYY-MM-DD` with the year drawn from `years`, month 1-12 and day 1-28.
fn random_date(rng: &mut dyn RngCore, years: &[i32]) -> String {
    let year = *pick(years, rng);
    let month: u32 = rng.random_range(1..=12);
    let day: u32 = rng.random_range(1..=28);
    format!("{year}-{month:02}-{day:02}")
}

fn random_authors(rng: &mut dyn RngCore) -> String {
    let count = rng.random_range(1..=MAX_AUTHORS);
    index::sample(rng, AUTHOR_POOL_SIZE, count)
        .into_iter()
        .map(|author| format!("Researcher {}", author + 1))
        .collect::<Vec<_>>()
        .join(AUTHOR_SEPARATOR)
}

fn pick<'a, T>(items: &'a [T], rng: &mut dyn RngCore) -> &'a T {
    &items[rng.random_range(0..items.len())]
}
