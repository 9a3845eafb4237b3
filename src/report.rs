//! Renders bucketed results as text or JSON.

use std::io::Write;

use serde::Serialize;

use crate::config::OutputFormat;
use crate::error::Result;
use crate::pipeline::{BucketSet, ScoredRecord, Threshold};

#[derive(Serialize)]
struct BucketReport<'a> {
    threshold: Threshold,
    description: &'static str,
    matches: &'a [ScoredRecord],
}

pub fn write_report<W: Write>(
    out: &mut W,
    buckets: &BucketSet,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text_report(out, buckets)?,
        OutputFormat::Json => write_json_report(out, buckets)?,
    }
    Ok(())
}

/// One section per non-empty bucket, highest tier first.
pub fn write_text_report<W: Write>(out: &mut W, buckets: &BucketSet) -> std::io::Result<()> {
    for (threshold, records) in buckets.iter_descending() {
        writeln!(out)?;
        writeln!(
            out,
            "--- Cities with similarity ≥ {} ({}) ---",
            threshold,
            threshold.description()
        )?;
        // Shortest round-trip form of the rounded score: 1.0, 0.7, 0.73
        for record in records {
            writeln!(out, "{} ({}) — Score: {:?}", record.city, record.state, record.score)?;
        }
    }
    Ok(())
}

pub fn write_json_report<W: Write>(out: &mut W, buckets: &BucketSet) -> serde_json::Result<()> {
    let report: Vec<BucketReport<'_>> = buckets
        .iter_descending()
        .map(|(threshold, matches)| BucketReport {
            threshold,
            description: threshold.description(),
            matches,
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out).map_err(serde_json::Error::io)
}
