//! Flat-file cache of (state, city) scores.
//!
//! The cache is loaded whole at start, consulted before scoring, and grows
//! only by appending. New scores are held as pending entries and written in a
//! single batch by [`ScoreCache::flush`], so an interrupted run writes nothing.
//!
//! # File layout
//! A CSV file with the header `state,city,score`. Scores carry two decimals.
//! Existing rows are never rewritten; if the same key appears twice the later
//! row wins on load.

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::SCORE_DECIMALS;
use crate::error::Result;

/// Cache key: (state, city), trimmed, case as stored.
pub type CacheKey = (String, String);

/// One row of the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub state: String,
    pub city: String,
    pub score: f64,
}

impl ScoreEntry {
    pub fn new(state: impl Into<String>, city: impl Into<String>, score: f64) -> Self {
        Self {
            state: state.into(),
            city: city.into(),
            score,
        }
    }
}

/// Round `value` to `decimals` places, taking the exact binary value of the
/// float and sending exact halves to the even digit.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Round a score to the precision kept in the cache file.
pub fn round_score(score: f64) -> f64 {
    round_to(score, SCORE_DECIMALS)
}

/// In-memory scores plus the entries computed since the last flush.
#[derive(Debug, Clone, Default)]
pub struct ScoreCache {
    scores: HashMap<CacheKey, f64>,
    pending: Vec<ScoreEntry>,
}

impl ScoreCache {
    /// Load the cache file at `path`. A missing file gives an empty cache.
    /// Rows that fail to parse are skipped.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut cache = Self::default();
        if !path.exists() {
            info!("No cache at {}, starting empty", path.display());
            return Ok(cache);
        }

        let mut reader = csv::Reader::from_path(path)?;
        for (i, row) in reader.deserialize::<ScoreEntry>().enumerate() {
            match row {
                Ok(entry) => cache.insert(entry),
                // Header is line 1
                Err(e) => warn!("Skipping cache row on line {}: {}", i + 2, e),
            }
        }

        info!("Loaded {} cached scores from {}", cache.len(), path.display());
        Ok(cache)
    }

    /// Exact-key lookup.
    pub fn lookup(&self, state: &str, city: &str) -> Option<f64> {
        self.scores
            .get(&(state.to_string(), city.to_string()))
            .copied()
    }

    /// Make a score available to lookups without scheduling it for writing.
    pub fn insert(&mut self, entry: ScoreEntry) {
        self.scores.insert((entry.state, entry.city), entry.score);
    }

    /// Add a freshly computed score. It is visible to lookups at once and
    /// written to disk on the next [`flush`](Self::flush).
    pub fn record_new(&mut self, entry: ScoreEntry) {
        debug!("Caching {} / {} = {}", entry.state, entry.city, entry.score);
        self.scores
            .insert((entry.state.clone(), entry.city.clone()), entry.score);
        self.pending.push(entry);
    }

    /// Entries recorded since the last flush, oldest first.
    pub fn pending(&self) -> &[ScoreEntry] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Append every pending entry to `path` in one batch and return how many
    /// rows were written. The header is written only when the file is new.
    /// Nothing is touched when there is nothing pending.
    pub fn flush(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if self.pending.is_empty() {
            debug!("No new scores to write to {}", path.display());
            return Ok(0);
        }

        let write_header = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        for entry in &self.pending {
            writer.serialize(entry)?;
        }
        writer.flush()?;

        let written = self.pending.len();
        self.pending.clear();
        info!("Appended {} new scores to {}", written, path.display());
        Ok(written)
    }
}
