use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, error::ErrorKind};
use rand::RngCore;
use tracing_subscriber::EnvFilter;

use crate::config::SamplerConfig;
use crate::constants::apps::{DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH};
use crate::constants::sampler::{DEFAULT_ROW_CAP, DEFAULT_SAMPLE_SIZE, DEFAULT_SEED};
use crate::data::Table;
use crate::metrics::{SampleSummary, sample_summary};
use crate::rng::{DeterministicRng, SamplerRngs};
use crate::sampler::CorpusSampler;
use crate::transport::csv::{read_raw, write_table};
use crate::verify::{inspect_sample, verify_sample_file};

#[derive(Debug, Parser)]
#[command(
    name = "create_sample",
    disable_help_subcommand = true,
    about = "Create a representative sample of a metadata CSV",
    long_about = "Draw a year-stratified, keyword- and abstract-boosted sample from a metadata CSV, append synthetic rows, and write the result. Falls back to a fully synthetic table when the input cannot be read."
)]
struct CreateSampleCli {
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_INPUT_PATH,
        help = "Source metadata CSV"
    )]
    input: PathBuf,
    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "Destination for the sampled CSV"
    )]
    output: PathBuf,
    #[arg(
        long = "sample-size",
        default_value_t = DEFAULT_SAMPLE_SIZE,
        value_parser = parse_positive_usize,
        help = "Maximum number of rows in the output"
    )]
    sample_size: usize,
    #[arg(
        long = "row-cap",
        default_value_t = DEFAULT_ROW_CAP,
        value_parser = parse_positive_usize,
        help = "Maximum number of source rows to read"
    )]
    row_cap: usize,
    #[arg(
        long,
        default_value_t = DEFAULT_SEED,
        help = "Seed for the sampling draws"
    )]
    seed: u64,
    #[arg(
        long = "synthetic-seed",
        help = "Optional seed for synthetic field values (unseeded by default)"
    )]
    synthetic_seed: Option<u64>,
    #[arg(long, help = "Print the sample summary as JSON")]
    json: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "verify_sample",
    disable_help_subcommand = true,
    about = "Verify a sampled metadata CSV"
)]
struct VerifySampleCli {
    #[arg(
        value_name = "PATH",
        default_value = DEFAULT_OUTPUT_PATH,
        help = "Sample CSV to verify"
    )]
    path: PathBuf,
    #[arg(long, help = "Print the verification report as JSON")]
    json: bool,
}

/// Install a `tracing` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Sample, write, summarize, and verify a metadata CSV.
pub fn run_create_sample<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let Some(cli) =
        parse_cli::<CreateSampleCli, _>(std::iter::once("create_sample".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let config = SamplerConfig {
        sample_size: cli.sample_size,
        row_cap: cli.row_cap,
        seed: cli.seed,
        ..SamplerConfig::default()
    };
    let sampler = CorpusSampler::new(config);

    let mut draws = DeterministicRng::new(cli.seed);
    let mut synthetic: Box<dyn RngCore> = match cli.synthetic_seed {
        Some(seed) => Box::new(DeterministicRng::new(seed)),
        None => Box::new(rand::rng()),
    };
    let mut rngs = SamplerRngs::new(&mut draws, synthetic.as_mut());

    let table = sampler.build_sample_from_csv(&cli.input, &mut rngs);
    write_table(&cli.output, &table)?;

    let summary = sample_summary(&table);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&cli.output, &table, &summary);
    }

    if !verify_sample_file(&cli.output) {
        return Err(format!("verification of '{}' failed", cli.output.display()).into());
    }
    Ok(())
}

/// Verify an existing sample CSV and print its statistics.
pub fn run_verify_sample<I>(args_iter: I) -> Result<(), Box<dyn Error>>
where
    I: Iterator<Item = String>,
{
    let Some(cli) =
        parse_cli::<VerifySampleCli, _>(std::iter::once("verify_sample".to_string()).chain(args_iter))?
    else {
        return Ok(());
    };

    let raw = read_raw(&cli.path, None)?;
    let report = inspect_sample(&raw)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("=== sample verification ===");
        println!("file        : {}", cli.path.display());
        println!("rows        : {}", report.rows);
        println!("columns     : {}", report.columns);
        println!("memory      : {:.1} MB", report.memory_mib());
        println!("title nulls : {}", report.title_nulls);
        println!(
            "date range  : {} to {}",
            report.date_min.as_deref().unwrap_or("n/a"),
            report.date_max.as_deref().unwrap_or("n/a")
        );
    }
    Ok(())
}

fn print_summary(output: &std::path::Path, table: &Table, summary: &SampleSummary) {
    println!("=== sample ===");
    println!("file              : {}", output.display());
    println!("size              : {} rows, {} columns", table.len(), summary.columns);
    println!(
        "date range        : {} to {}",
        summary.date_min.as_deref().unwrap_or("n/a"),
        summary.date_max.as_deref().unwrap_or("n/a")
    );
    println!("with abstracts    : {}", summary.abstracts_present);
    println!("unique journals   : {}", summary.unique_journals);
    println!("mentioning 2020   : {}", summary.rows_mentioning_2020);
    for share in &summary.per_year {
        println!(
            "  {}            : {:>6} ({:.1}%)",
            share.year,
            share.count,
            share.share * 100.0
        );
    }
}

fn parse_positive_usize(raw: &str) -> Result<usize, String> {
    let parsed = raw
        .parse::<usize>()
        .map_err(|_| format!("Could not parse '{}' as a positive integer", raw))?;
    if parsed == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(parsed)
}

fn parse_cli<T, I>(args: I) -> Result<Option<T>, Box<dyn Error>>
where
    T: Parser,
    I: IntoIterator,
    I::Item: Into<std::ffi::OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                Ok(None)
            }
            _ => Err(err.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn parse_positive_usize_rejects_zero_and_garbage() {
        assert_eq!(parse_positive_usize("12"), Ok(12));
        assert!(parse_positive_usize("0").is_err());
        assert!(parse_positive_usize("-3").is_err());
    }

    #[test]
    fn create_sample_cli_uses_defaults() {
        let cli = parse_cli::<CreateSampleCli, _>(["create_sample"]).unwrap().unwrap();
        assert_eq!(cli.input, PathBuf::from(DEFAULT_INPUT_PATH));
        assert_eq!(cli.output, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(cli.sample_size, DEFAULT_SAMPLE_SIZE);
        assert_eq!(cli.seed, DEFAULT_SEED);
        assert_eq!(cli.synthetic_seed, None);
    }

    #[test]
    fn help_returns_none() {
        assert!(
            parse_cli::<VerifySampleCli, _>(["verify_sample", "--help"])
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn run_create_sample_writes_synthetic_output_for_missing_input() {
        let temp = tempdir().unwrap();
        let input = temp.path().join("absent.csv");
        let output = temp.path().join("out/sample.csv");
        run_create_sample(args(&[
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--sample-size",
            "40",
            "--synthetic-seed",
            "3",
        ]))
        .unwrap();
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(written.lines().count(), 41);
        run_verify_sample(args(&[output.to_str().unwrap()])).unwrap();
    }

    #[test]
    fn run_verify_sample_fails_without_title_column() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("bad.csv");
        fs::write(&path, "cord_uid,publish_time\nu1,2020-01-01\n").unwrap();
        assert!(run_verify_sample(args(&[path.to_str().unwrap()])).is_err());
    }
}
