//! Scores records (cache first, scorer on a miss) and sorts them into
//! threshold buckets.

use std::collections::BTreeMap;
use std::fmt;
use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use serde::Serialize;

use crate::cache::{round_score, round_to, ScoreCache, ScoreEntry};
use crate::config::{MAX_THRESHOLD_TENTHS, SIMILARITY_DESCRIPTIONS, UNLABELED_DESCRIPTION};
use crate::error::ThresholdError;
use crate::records::Record;
use crate::scorer::SimilarityScorer;

/// One of the eleven tiers 0.0, 0.1, ..., 1.0, stored as tenths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(u8);

impl Threshold {
    pub const MAX: Threshold = Threshold(MAX_THRESHOLD_TENTHS);
    pub const MIN: Threshold = Threshold(0);

    pub fn from_tenths(tenths: u8) -> Option<Self> {
        (tenths <= MAX_THRESHOLD_TENTHS).then_some(Threshold(tenths))
    }

    /// Round `value` to one decimal and map it onto a tier.
    pub fn from_value(value: f64) -> Result<Self, ThresholdError> {
        if !value.is_finite() {
            return Err(ThresholdError::NotANumber);
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(ThresholdError::OutOfRange(value));
        }
        Ok(Threshold((round_to(value, 1) * 10.0).round() as u8))
    }

    pub fn tenths(self) -> u8 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    pub fn description(self) -> &'static str {
        SIMILARITY_DESCRIPTIONS
            .iter()
            .find(|(tenths, _)| *tenths == self.0)
            .map(|(_, desc)| *desc)
            .unwrap_or(UNLABELED_DESCRIPTION)
    }

    pub fn is_met_by(self, score: f64) -> bool {
        score >= self.value()
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold(crate::config::DEFAULT_MIN_THRESHOLD_TENTHS)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.value())
    }
}

impl Serialize for Threshold {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.value())
    }
}

/// The threshold ladder from 1.0 down to a chosen minimum, highest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    descending: Vec<Threshold>,
}

impl Thresholds {
    pub fn from_minimum(minimum: Threshold) -> Self {
        let descending = (minimum.0..=MAX_THRESHOLD_TENTHS)
            .rev()
            .map(Threshold)
            .collect();
        Self { descending }
    }

    pub fn minimum(&self) -> Threshold {
        // Never empty: the ladder always contains 1.0
        self.descending.last().copied().unwrap_or(Threshold::MAX)
    }

    /// Highest threshold the score meets, or `None` when it falls below the
    /// minimum.
    pub fn tier_for(&self, score: f64) -> Option<Threshold> {
        self.descending.iter().copied().find(|t| t.is_met_by(score))
    }

    pub fn iter(&self) -> impl Iterator<Item = Threshold> + '_ {
        self.descending.iter().copied()
    }
}

/// A record that made it into a bucket, with the score it was filed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub state: String,
    pub city: String,
    pub score: f64,
}

/// Records grouped by tier, each bucket in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketSet {
    buckets: BTreeMap<Threshold, Vec<ScoredRecord>>,
}

impl BucketSet {
    pub fn push(&mut self, threshold: Threshold, record: ScoredRecord) {
        self.buckets.entry(threshold).or_default().push(record);
    }

    pub fn get(&self, threshold: Threshold) -> &[ScoredRecord] {
        self.buckets
            .get(&threshold)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty buckets from the highest tier down.
    pub fn iter_descending(&self) -> impl Iterator<Item = (Threshold, &[ScoredRecord])> + '_ {
        self.buckets
            .iter()
            .rev()
            .filter(|(_, records)| !records.is_empty())
            .map(|(threshold, records)| (*threshold, records.as_slice()))
    }

    /// Total number of bucketed records.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of one bucketing pass.
#[derive(Debug, Clone, Default)]
pub struct Bucketing {
    pub buckets: BucketSet,
    /// Scores computed during this pass (cache misses), in input order.
    pub new_entries: Vec<ScoreEntry>,
}

/// Row progress bar on stderr. Hidden when `visible` is false or stderr is
/// not a terminal.
pub fn progress_bar(len: u64, visible: bool) -> ProgressBar {
    if !visible || !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::with_template(
        "{msg}: {percent:>3}%|{bar:30.green/blue}| {pos}/{len} [{elapsed_precise}<{eta_precise}]",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    pb.set_message("Processing rows");
    pb
}

/// Score every record and file it under the highest tier it reaches.
///
/// Scores come from `cache` when present; misses go to `scorer`, are rounded
/// to the cache precision and recorded in `cache` as pending entries. Records
/// with a blank state or city are skipped, and records scoring below the
/// ladder's minimum are dropped.
pub fn bucket_records<I, S>(
    records: I,
    cache: &mut ScoreCache,
    scorer: &S,
    thresholds: &Thresholds,
) -> Bucketing
where
    I: IntoIterator<Item = Record>,
    S: SimilarityScorer + ?Sized,
{
    bucket_records_with_progress(records, cache, scorer, thresholds, &ProgressBar::hidden())
}

/// [`bucket_records`], advancing `progress` once per record.
pub fn bucket_records_with_progress<I, S>(
    records: I,
    cache: &mut ScoreCache,
    scorer: &S,
    thresholds: &Thresholds,
    progress: &ProgressBar,
) -> Bucketing
where
    I: IntoIterator<Item = Record>,
    S: SimilarityScorer + ?Sized,
{
    let mut result = Bucketing::default();
    let (mut seen, mut skipped, mut hits, mut dropped) = (0usize, 0usize, 0usize, 0usize);

    for record in records {
        seen += 1;
        progress.inc(1);
        let state = record.state.trim();
        let city = record.city.trim();
        if state.is_empty() || city.is_empty() {
            debug!("Skipping record {} with blank state or city", seen);
            skipped += 1;
            continue;
        }

        let score = match cache.lookup(state, city) {
            Some(cached) => {
                hits += 1;
                cached
            }
            None => {
                let computed = round_score(scorer.score(state, city));
                let entry = ScoreEntry::new(state, city, computed);
                cache.record_new(entry.clone());
                result.new_entries.push(entry);
                computed
            }
        };

        match thresholds.tier_for(score) {
            Some(tier) => result.buckets.push(
                tier,
                ScoredRecord {
                    state: state.to_string(),
                    city: city.to_string(),
                    score,
                },
            ),
            None => dropped += 1,
        }
    }
    progress.finish();

    info!(
        "Bucketed {} of {} records ({} skipped, {} below {}, {} cache hits, {} newly scored)",
        result.buckets.len(),
        seen,
        skipped,
        dropped,
        thresholds.minimum(),
        hits,
        result.new_entries.len()
    );
    result
}
