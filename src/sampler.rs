use indexmap::IndexSet;
use rand::RngCore;
use rand::seq::{SliceRandom, index};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::config::SamplerConfig;
use crate::data::{Row, Table};
use crate::dates::publish_year;
use crate::errors::{SamplerError, StratificationFailure};
use crate::rng::SamplerRngs;
use crate::schema::Field;
use crate::synthetic::{augmentation_rows, fallback_table};
use crate::transport::csv::read_table;
use crate::types::Year;

/// Row indices of the source table grouped by publish year, ascending.
pub type YearStrata = BTreeMap<Year, Vec<usize>>;

/// Builds a smaller representative table from a large metadata table.
///
/// The pipeline is: stratified base sample by publish year, keyword boost,
/// content-completeness boost, then a final block of synthetic rows. Output
/// never exceeds `SamplerConfig::sample_size` rows.
#[derive(Clone, Debug, Default)]
pub struct CorpusSampler {
    config: SamplerConfig,
}

impl CorpusSampler {
    /// Sampler driven by `config`.
    pub fn new(config: SamplerConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Read at most `row_cap` rows from `path` and sample them.
    ///
    /// Never fails: unreadable input produces the synthetic fallback table.
    pub fn build_sample_from_csv(&self, path: &Path, rngs: &mut SamplerRngs<'_>) -> Table {
        info!(path = %path.display(), row_cap = self.config.row_cap, "reading source table");
        let source = read_table(path, Some(self.config.row_cap));
        self.build_sample(source, rngs)
    }

    /// Sample `source`, switching to a fully synthetic table when the source is unusable.
    pub fn build_sample(
        &self,
        source: Result<Table, SamplerError>,
        rngs: &mut SamplerRngs<'_>,
    ) -> Table {
        match source.and_then(|table| self.sample_table(&table, rngs)) {
            Ok(table) => table,
            Err(err) if err.triggers_fallback() => {
                warn!(error = %err, "source unavailable; creating synthetic sample instead");
                fallback_table(self.config.sample_size, rngs.synthetic)
            }
            Err(err) => {
                error!(error = %err, "sampling failed; creating synthetic sample instead");
                fallback_table(self.config.sample_size, rngs.synthetic)
            }
        }
    }

    /// Run the full sampling pipeline on an in-memory table.
    ///
    /// Returns `ReadFailure` for an empty source; stratification problems are
    /// absorbed by degrading to a uniform base sample.
    pub fn sample_table(
        &self,
        source: &Table,
        rngs: &mut SamplerRngs<'_>,
    ) -> Result<Table, SamplerError> {
        if source.is_empty() {
            return Err(SamplerError::read("table", "source table is empty"));
        }
        let base = self.base_sample(source, rngs.draws);
        info!(rows = base.len(), source_rows = source.len(), "base sample drawn");
        let boosted = self.keyword_boost(source, base, rngs.draws);
        let boosted = self.content_boost(source, boosted, rngs.draws);
        info!(rows = boosted.len(), "boosts applied");
        let sample = self.augment(boosted, rngs.synthetic)?;
        info!(rows = sample.len(), "sample complete");
        Ok(sample)
    }

    /// Stratified sample by publish year, or a uniform sample when stratification fails.
    pub fn base_sample(&self, source: &Table, rng: &mut dyn RngCore) -> Table {
        match self.stratified_sample(source, rng) {
            Ok(sample) => sample,
            Err(failure) => {
                debug!(reason = %failure, "stratification unavailable; using uniform sample");
                uniform_sample(source, self.config.sample_size, rng)
            }
        }
    }

    /// Proportional per-year draw, shuffled and truncated to `sample_size`.
    pub fn stratified_sample(
        &self,
        source: &Table,
        rng: &mut dyn RngCore,
    ) -> Result<Table, StratificationFailure> {
        let strata = year_strata(source)?;
        let mut picked = draw_strata(&strata, self.config.sample_size, rng)?;
        picked.shuffle(rng);
        picked.truncate(self.config.sample_size);
        Ok(source.select(&picked))
    }

    /// Union up to `keyword_boost_limit` title matches per keyword into `working`.
    pub fn keyword_boost(&self, source: &Table, working: Table, rng: &mut dyn RngCore) -> Table {
        let Some(title_idx) = source.schema().position(Field::Title) else {
            return working;
        };
        let mut working = working;
        for keyword in &self.config.keywords {
            let needle = keyword.to_lowercase();
            let matches: Vec<usize> = source
                .rows()
                .iter()
                .enumerate()
                .filter(|(_, row)| {
                    row.get(title_idx)
                        .is_some_and(|title| title.to_lowercase().contains(&needle))
                })
                .map(|(idx, _)| idx)
                .collect();
            if matches.is_empty() {
                continue;
            }
            let extra = draw_subset(&matches, self.config.keyword_boost_limit, rng);
            debug!(keyword = %needle, matches = matches.len(), drawn = extra.len(), "keyword boost");
            working = union_dedup(working, source.select(&extra), self.config.sample_size);
        }
        working
    }

    /// Union up to `content_boost_limit` rows with a substantial abstract into `working`.
    ///
    /// Always deduplicates `working`, even when no row qualifies.
    pub fn content_boost(&self, source: &Table, working: Table, rng: &mut dyn RngCore) -> Table {
        let Some(abstract_idx) = source.schema().position(Field::Abstract) else {
            return working;
        };
        let min_chars = self.config.min_content_chars;
        let candidates: Vec<usize> = source
            .rows()
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                row.get(abstract_idx)
                    .is_some_and(|text| text.chars().count() > min_chars)
            })
            .map(|(idx, _)| idx)
            .collect();
        let extra = draw_subset(&candidates, self.config.content_boost_limit, rng);
        debug!(candidates = candidates.len(), drawn = extra.len(), "content boost");
        union_dedup(working, source.select(&extra), self.config.sample_size)
    }

    /// Append the synthetic block as the final rows without exceeding `sample_size`.
    ///
    /// The output schema is the working schema plus any absent known field;
    /// real rows get nulls in the added columns. Real rows are cut to make
    /// room, so the block always survives; when `sample_size` is smaller than
    /// the block, the block itself is cut.
    pub fn augment(&self, working: Table, rng: &mut dyn RngCore) -> Result<Table, SamplerError> {
        let sample_size = self.config.sample_size;
        let synthetic_count = self.config.synthetic_rows.min(sample_size);
        let schema = working.schema().with_all_fields();
        let width = schema.len();
        let mut rows: Vec<Row> = working
            .into_rows()
            .into_iter()
            .take(sample_size - synthetic_count)
            .map(|row| row.widened(width))
            .collect();
        rows.extend(augmentation_rows(&schema, synthetic_count, rng));
        Table::new(schema, rows)
    }
}

/// Group row indices by publish year.
///
/// Fails when the table has no date column or when any row's date is null or
/// unparseable; no draw happens in either case.
pub fn year_strata(table: &Table) -> Result<YearStrata, StratificationFailure> {
    let date_idx = table
        .schema()
        .date_column()
        .ok_or(StratificationFailure::MissingDateField)?;
    let mut strata = YearStrata::new();
    for (row_idx, row) in table.rows().iter().enumerate() {
        let value = row.get(date_idx);
        let year = value.and_then(publish_year).ok_or_else(|| {
            StratificationFailure::UnparseableDate {
                row: row_idx,
                value: value.map(str::to_string),
            }
        })?;
        strata.entry(year).or_default().push(row_idx);
    }
    Ok(strata)
}

/// Rows drawn from a stratum: `max(1, round(sample_size * stratum_len / total))`,
/// capped at the stratum size.
pub fn stratum_allocation(stratum_len: usize, total: usize, sample_size: usize) -> usize {
    if stratum_len == 0 || total == 0 {
        return 0;
    }
    let proportional = (sample_size as f64 * stratum_len as f64 / total as f64).round() as usize;
    proportional.max(1).min(stratum_len)
}

/// Draw each stratum's allocation without replacement, strata in ascending year order.
pub fn draw_strata(
    strata: &YearStrata,
    sample_size: usize,
    rng: &mut dyn RngCore,
) -> Result<Vec<usize>, StratificationFailure> {
    let total: usize = strata.values().map(Vec::len).sum();
    if total == 0 {
        return Err(StratificationFailure::EmptySource);
    }
    let mut picked = Vec::new();
    for members in strata.values() {
        let amount = stratum_allocation(members.len(), total, sample_size);
        picked.extend(draw_subset(members, amount, rng));
    }
    Ok(picked)
}

/// Uniform sample of `min(sample_size, len)` rows without replacement.
pub fn uniform_sample(source: &Table, sample_size: usize, rng: &mut dyn RngCore) -> Table {
    let amount = sample_size.min(source.len());
    let picked = index::sample(rng, source.len(), amount).into_vec();
    source.select(&picked)
}

/// Concatenate, drop full-row duplicates keeping first occurrences, then truncate.
pub fn union_dedup(working: Table, extra: Table, limit: usize) -> Table {
    let schema = working.schema().clone();
    let rows: IndexSet<Row> = working
        .into_rows()
        .into_iter()
        .chain(extra.into_rows())
        .collect();
    Table::from_aligned(schema, rows.into_iter().take(limit).collect())
}

fn draw_subset(candidates: &[usize], limit: usize, rng: &mut dyn RngCore) -> Vec<usize> {
    let amount = limit.min(candidates.len());
    index::sample(rng, candidates.len(), amount)
        .into_iter()
        .map(|pos| candidates[pos])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::DeterministicRng;
    use crate::schema::Schema;
    use std::collections::HashSet;

    fn paper(uid: &str, title: &str, abstract_text: Option<&str>, date: Option<&str>) -> Row {
        Row::new(vec![
            Some(uid.to_string()),
            Some(title.to_string()),
            abstract_text.map(str::to_string),
            date.map(str::to_string),
        ])
    }

    fn schema() -> Schema {
        Schema::from_fields([Field::CordUid, Field::Title, Field::Abstract, Field::PublishTime])
    }

    fn sampler(sample_size: usize, synthetic_rows: usize) -> CorpusSampler {
        CorpusSampler::new(SamplerConfig {
            sample_size,
            synthetic_rows,
            ..SamplerConfig::default()
        })
    }

    fn dated_table(per_year: &[(Year, usize)]) -> Table {
        let mut rows = Vec::new();
        for (year, count) in per_year {
            for idx in 0..*count {
                rows.push(paper(
                    &format!("{year}-{idx}"),
                    &format!("Paper {idx} of {year}"),
                    None,
                    Some(&format!("{year}-06-01")),
                ));
            }
        }
        Table::new(schema(), rows).unwrap()
    }

    #[test]
    fn stratum_allocation_rounds_and_clamps() {
        assert_eq!(stratum_allocation(25, 100, 10), 3);
        assert_eq!(stratum_allocation(35, 100, 10), 4);
        assert_eq!(stratum_allocation(1, 1_000, 10), 1);
        assert_eq!(stratum_allocation(4, 10, 100), 4);
        assert_eq!(stratum_allocation(0, 10, 100), 0);
    }

    #[test]
    fn year_strata_groups_rows_in_year_order() {
        let table = dated_table(&[(2021, 2), (2019, 3)]);
        let strata = year_strata(&table).unwrap();
        assert_eq!(strata.keys().copied().collect::<Vec<_>>(), vec![2019, 2021]);
        assert_eq!(strata[&2019], vec![2, 3, 4]);
        assert_eq!(strata[&2021], vec![0, 1]);
    }

    #[test]
    fn year_strata_reports_date_failures_separately() {
        let no_dates = Table::new(
            Schema::from_fields([Field::CordUid, Field::Title, Field::Abstract]),
            vec![Row::new(vec![Some("a".into()), Some("t".into()), None])],
        )
        .unwrap();
        assert_eq!(
            year_strata(&no_dates).unwrap_err(),
            StratificationFailure::MissingDateField
        );

        let bad = Table::new(
            schema(),
            vec![
                paper("a", "t", None, Some("2020-01-01")),
                paper("b", "t", None, Some("someday")),
            ],
        )
        .unwrap();
        assert_eq!(
            year_strata(&bad).unwrap_err(),
            StratificationFailure::UnparseableDate {
                row: 1,
                value: Some("someday".to_string())
            }
        );

        let null_date = Table::new(schema(), vec![paper("a", "t", None, None)]).unwrap();
        assert!(matches!(
            year_strata(&null_date).unwrap_err(),
            StratificationFailure::UnparseableDate { row: 0, value: None }
        ));
    }

    #[test]
    fn draw_strata_fails_on_empty_strata() {
        let mut rng = DeterministicRng::new(42);
        assert_eq!(
            draw_strata(&YearStrata::new(), 10, &mut rng).unwrap_err(),
            StratificationFailure::EmptySource
        );
    }

    #[test]
    fn stratified_sample_preserves_year_proportions() {
        let table = dated_table(&[(2019, 100), (2020, 400), (2021, 300), (2022, 200)]);
        let sampler = sampler(100, 0);
        let mut rng = DeterministicRng::new(42);
        let sample = sampler.stratified_sample(&table, &mut rng).unwrap();
        assert_eq!(sample.len(), 100);
        let mut counts: BTreeMap<Year, usize> = BTreeMap::new();
        for row in sample.rows() {
            let year = publish_year(row.get(3).unwrap()).unwrap();
            *counts.entry(year).or_default() += 1;
        }
        assert_eq!(counts[&2019], 10);
        assert_eq!(counts[&2020], 40);
        assert_eq!(counts[&2021], 30);
        assert_eq!(counts[&2022], 20);
        let unique: HashSet<&Row> = sample.rows().iter().collect();
        assert_eq!(unique.len(), sample.len());
    }

    #[test]
    fn stratified_sample_keeps_tiny_strata() {
        let table = dated_table(&[(2019, 1), (2020, 999)]);
        let sampler = sampler(10, 0);
        let mut rng = DeterministicRng::new(42);
        let sample = sampler.stratified_sample(&table, &mut rng).unwrap();
        assert!(sample.len() <= 10);
        // 1 + round(9.99) = 11 drawn before truncation, so the 2019 row may be cut.
        let strata = year_strata(&table).unwrap();
        let drawn = draw_strata(&strata, 10, &mut rng).unwrap();
        assert!(drawn.contains(&0));
        assert_eq!(drawn.len(), 11);
    }

    #[test]
    fn base_sample_degrades_to_uniform_on_bad_dates() {
        let rows = (0..50)
            .map(|idx| paper(&format!("u{idx}"), "t", None, Some("n/a")))
            .collect();
        let table = Table::new(schema(), rows).unwrap();
        let sampler = sampler(20, 0);
        let mut rng = DeterministicRng::new(42);
        let sample = sampler.base_sample(&table, &mut rng);
        assert_eq!(sample.len(), 20);

        let mut again = DeterministicRng::new(42);
        assert_eq!(sampler.base_sample(&table, &mut again), sample);
    }

    #[test]
    fn uniform_sample_caps_at_table_size() {
        let table = dated_table(&[(2020, 5)]);
        let mut rng = DeterministicRng::new(1);
        assert_eq!(uniform_sample(&table, 50, &mut rng).len(), 5);
    }

    #[test]
    fn keyword_boost_draws_matches_from_full_source() {
        let mut rows = Vec::new();
        for idx in 0..200 {
            let title = if idx % 2 == 0 {
                format!("COVID-19 outcomes {idx}")
            } else {
                format!("Influenza study {idx}")
            };
            rows.push(paper(&format!("u{idx}"), &title, None, Some("2020-01-01")));
        }
        let table = Table::new(schema(), rows).unwrap();
        let sampler = sampler(1_000, 0);
        let mut rng = DeterministicRng::new(42);
        let boosted = sampler.keyword_boost(&table, Table::empty(schema()), &mut rng);
        // Only "covid" matches; capped at 50.
        assert_eq!(boosted.len(), 50);
        assert!(boosted
            .rows()
            .iter()
            .all(|row| row.get(1).unwrap().contains("COVID")));
    }

    #[test]
    fn keyword_boost_ignores_null_titles_and_respects_limit() {
        let table = Table::new(
            schema(),
            vec![
                Row::new(vec![Some("a".into()), None, None, None]),
                paper("b", "Pandemic preparedness", None, None),
            ],
        )
        .unwrap();
        let sampler = sampler(1, 0);
        let mut rng = DeterministicRng::new(42);
        let working = table.select(&[0]);
        let boosted = sampler.keyword_boost(&table, working, &mut rng);
        assert_eq!(boosted.len(), 1);
        assert_eq!(boosted.rows()[0].get(0), Some("a"));
    }

    #[test]
    fn content_boost_requires_long_abstracts() {
        let long = "x".repeat(101);
        let exact = "y".repeat(100);
        let table = Table::new(
            schema(),
            vec![
                paper("long", "t", Some(&long), None),
                paper("exact", "t", Some(&exact), None),
                paper("none", "t", None, None),
            ],
        )
        .unwrap();
        let sampler = sampler(10, 0);
        let mut rng = DeterministicRng::new(42);
        let boosted = sampler.content_boost(&table, Table::empty(schema()), &mut rng);
        assert_eq!(boosted.len(), 1);
        assert_eq!(boosted.rows()[0].get(0), Some("long"));
    }

    #[test]
    fn content_boost_draws_at_most_the_configured_limit() {
        let long = "z".repeat(150);
        let rows = (0..40)
            .map(|idx| paper(&format!("u{idx}"), "t", Some(&long), None))
            .collect();
        let table = Table::new(schema(), rows).unwrap();
        let sampler = CorpusSampler::new(SamplerConfig {
            sample_size: 1_000,
            content_boost_limit: 7,
            ..SamplerConfig::default()
        });
        let mut rng = DeterministicRng::new(42);
        let boosted = sampler.content_boost(&table, Table::empty(schema()), &mut rng);
        assert_eq!(boosted.len(), 7);
        let unique: HashSet<&Row> = boosted.rows().iter().collect();
        assert_eq!(unique.len(), 7);

        let working = table.select(&[0, 1, 2]);
        let boosted = sampler.content_boost(&table, working, &mut rng);
        assert!((7..=10).contains(&boosted.len()));
    }

    #[test]
    fn union_dedup_keeps_first_occurrence_order() {
        let table = dated_table(&[(2020, 4)]);
        let merged = union_dedup(table.select(&[2, 0]), table.select(&[0, 1, 2, 3]), 10);
        let ids: Vec<&str> = merged.rows().iter().map(|r| r.get(0).unwrap()).collect();
        assert_eq!(ids, vec!["2020-2", "2020-0", "2020-1", "2020-3"]);
        assert_eq!(union_dedup(table.clone(), table, 2).len(), 2);
    }

    #[test]
    fn augment_reserves_room_for_synthetic_block() {
        let table = dated_table(&[(2020, 30)]);
        let mut rng = DeterministicRng::new(7);
        let out = sampler(20, 5).augment(table.clone(), &mut rng).unwrap();
        assert_eq!(out.len(), 20);
        assert!(out.rows()[15..].iter().all(|row| row.get(0).unwrap().starts_with("synth_")));
        assert!(out.rows()[..15].iter().all(|row| !row.get(0).unwrap().starts_with("synth_")));

        let tiny = sampler(3, 5).augment(table, &mut rng).unwrap();
        assert_eq!(tiny.len(), 3);
        assert!(tiny.rows().iter().all(|row| row.is_fully_populated()));
    }

    #[test]
    fn augment_completes_schema_and_keeps_passthrough_columns() {
        let schema = Schema::bind("t", &["cord_uid", "sha", "title", "abstract", "journal"]).unwrap();
        let rows = (0..4)
            .map(|idx| {
                Row::new(vec![
                    Some(format!("u{idx}")),
                    Some(format!("sha{idx}")),
                    Some("t".to_string()),
                    None,
                    Some("BMJ".to_string()),
                ])
            })
            .collect();
        let table = Table::new(schema, rows).unwrap();
        let mut rng = DeterministicRng::new(3);
        let out = sampler(10, 2).augment(table, &mut rng).unwrap();
        assert_eq!(
            out.schema().column_names(),
            vec![
                "cord_uid",
                "sha",
                "title",
                "abstract",
                "journal",
                "publish_time",
                "authors",
                "url",
                "pdf_json_files",
                "pmc_json_files",
                "who_covidence_id",
            ]
        );
        assert_eq!(out.len(), 6);
        let real = &out.rows()[0];
        assert_eq!(real.get(1), Some("sha0"));
        assert_eq!(out.value(real, Field::Journal), Some("BMJ"));
        assert!(real.values()[5..].iter().all(Option::is_none));
        for row in &out.rows()[4..] {
            assert_eq!(row.get(1), None);
            for field in Field::ALL {
                assert!(out.value(row, field).is_some(), "{field:?} is null");
            }
        }
    }

    #[test]
    fn empty_source_falls_back_to_synthetic_table() {
        let sampler = sampler(25, 5);
        let mut draws = DeterministicRng::new(42);
        let mut synthetic = DeterministicRng::new(1);
        let mut rngs = SamplerRngs::new(&mut draws, &mut synthetic);
        let out = sampler.build_sample(Ok(Table::empty(schema())), &mut rngs);
        assert_eq!(out.len(), 25);
        assert_eq!(out.schema(), &Schema::full());
        assert_eq!(out.rows()[0].get(0), Some("uid000000"));
    }

    #[test]
    fn read_failure_falls_back_to_synthetic_table() {
        let sampler = sampler(8, 5);
        let mut draws = DeterministicRng::new(42);
        let mut synthetic = DeterministicRng::new(1);
        let mut rngs = SamplerRngs::new(&mut draws, &mut synthetic);
        let out = sampler.build_sample(Err(SamplerError::read("x.csv", "missing")), &mut rngs);
        assert_eq!(out.len(), 8);
    }
}
