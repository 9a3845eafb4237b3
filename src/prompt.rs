//! Interactive prompt for the minimum similarity threshold.
//!
//! The loop has one waiting state: read a line, then either show the help
//! text and wait again, reject the input and wait again, or accept a
//! threshold and stop.

use std::io::{BufRead, Write};

use log::debug;

use crate::config::{HELP_TOKEN, SIMILARITY_DESCRIPTIONS};
use crate::error::{Error, Result, ThresholdError};
use crate::pipeline::Threshold;

const PROMPT: &str =
    "Enter minimum similarity threshold (e.g., 0.5) or type '?' to view similarity descriptions: ";

const BACKGROUND: &str = concat!(
    "\n Background for this Program:\n",
    "This program compares the names of U.S. cities and their corresponding states.\n",
    "It measures how similar the names are using cosine similarity on character-level n-grams.\n",
    "Similarity scores range from 0.0 (no similarity) to 1.0 (exact match).\n",
    "This tool is intended to be used to see \"how many American states have cities in them ",
    "that is also the name of the state\".\n",
    "\n",
    "This tool was requested by the Crumbl/Get Chunky crew.\n",
    "\n",
);

/// A line of accepted prompt input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptInput {
    Help,
    Minimum(Threshold),
}

/// Interpret one line typed at the prompt.
pub fn parse_threshold_input(input: &str) -> std::result::Result<PromptInput, ThresholdError> {
    let trimmed = input.trim();
    if trimmed == HELP_TOKEN {
        return Ok(PromptInput::Help);
    }

    let value: f64 = trimmed.parse().map_err(|_| ThresholdError::NotANumber)?;
    Threshold::from_value(value).map(PromptInput::Minimum)
}

/// Write the background text and the description table.
pub fn write_help<W: Write>(out: &mut W) -> std::io::Result<()> {
    write!(out, "{}", BACKGROUND)?;
    writeln!(out, "--- Similarity Descriptions ---")?;
    for (tenths, description) in SIMILARITY_DESCRIPTIONS {
        writeln!(out, "{:.1}: {}", f64::from(tenths) / 10.0, description)?;
    }
    writeln!(out)
}

/// Ask until a valid threshold is entered.
///
/// Invalid lines get a retry message; `?` prints the help. Running out of
/// input before a threshold is accepted returns [`Error::PromptClosed`].
pub fn prompt_minimum_threshold<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<Threshold> {
    let mut line = String::new();
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::PromptClosed);
        }

        match parse_threshold_input(&line) {
            Ok(PromptInput::Minimum(threshold)) => {
                debug!("Minimum threshold set to {}", threshold);
                return Ok(threshold);
            }
            Ok(PromptInput::Help) => write_help(out)?,
            Err(e) => writeln!(out, "{}", e)?,
        }
    }
}
