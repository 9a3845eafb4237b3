//! Scores how similar U.S. city names are to their state names and groups the
//! results into 0.1-wide similarity tiers.
//!
//! A run reads (state, city) records, takes each score from the on-disk
//! [`ScoreCache`] or computes it with a [`SimilarityScorer`], files every
//! record under the highest [`Threshold`] it meets, appends the newly computed
//! scores to the cache in one batch and prints the non-empty buckets.

use std::io::{BufRead, Write};

use log::info;

pub mod cache;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod records;
pub mod report;
pub mod scorer;

pub use cache::{round_score, ScoreCache, ScoreEntry};
pub use config::{InputColumns, OutputFormat, RunConfig};
pub use error::{Error, Result, ThresholdError};
pub use pipeline::{
    bucket_records, bucket_records_with_progress, BucketSet, Bucketing, ScoredRecord, Threshold,
    Thresholds,
};
pub use records::{read_records, read_records_from_reader, Record};
pub use scorer::{score, NgramScorer, SimilarityScorer};

/// Counts from a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub minimum: Threshold,
    pub records: usize,
    pub bucketed: usize,
    pub new_scores: usize,
}

/// Run the whole pipeline with the default scorer.
///
/// When `config.min_threshold` is unset the user is asked for it on
/// `input`/`out` first. The report is written to `out`.
pub fn run<R: BufRead, W: Write>(
    config: &RunConfig,
    input: &mut R,
    out: &mut W,
) -> Result<RunSummary> {
    run_with_scorer(config, &NgramScorer::default(), input, out)
}

pub fn run_with_scorer<S, R, W>(
    config: &RunConfig,
    scorer: &S,
    input: &mut R,
    out: &mut W,
) -> Result<RunSummary>
where
    S: SimilarityScorer + ?Sized,
    R: BufRead,
    W: Write,
{
    let minimum = match config.min_threshold {
        Some(threshold) => threshold,
        None => prompt::prompt_minimum_threshold(input, out)?,
    };
    let thresholds = Thresholds::from_minimum(minimum);

    let mut cache = ScoreCache::load(&config.cache_path)?;
    let records = read_records(&config.input_path, &config.columns)?;
    let record_count = records.len();

    let show_progress = config.progress && config.format == OutputFormat::Text;
    let progress = pipeline::progress_bar(record_count as u64, show_progress);
    let Bucketing {
        buckets,
        new_entries,
    } = bucket_records_with_progress(records, &mut cache, scorer, &thresholds, &progress);
    let new_scores = cache.flush(&config.cache_path)?;
    debug_assert_eq!(new_scores, new_entries.len());

    report::write_report(out, &buckets, config.format)?;
    out.flush()?;

    info!(
        "Done: {} of {} records at or above {}, {} new scores cached",
        buckets.len(),
        record_count,
        minimum,
        new_scores
    );
    Ok(RunSummary {
        minimum,
        records: record_count,
        bucketed: buckets.len(),
        new_scores,
    })
}
