//! Application-level configuration constants.

use std::path::PathBuf;

use crate::pipeline::Threshold;

// Files
pub const DEFAULT_INPUT_PATH: &str = "us_cities.csv";
pub const DEFAULT_CACHE_PATH: &str = "similarity_cache.csv";

// Column identifiers agreed upon with the data provider
pub const DEFAULT_STATE_COLUMN: &str = "STATE_NAME";
pub const DEFAULT_CITY_COLUMN: &str = "CITY";

// Scoring
pub const NGRAM_MIN: usize = 2;
pub const NGRAM_MAX: usize = 4;
pub const WHOLE_WORD_BOOST: f64 = 0.45;
pub const SUBSTRING_BOOST: f64 = 0.20;

// Cached scores keep this many decimal places
pub const SCORE_DECIMALS: usize = 2;

// Threshold tiers are tenths from 0.0 to 1.0
pub const MAX_THRESHOLD_TENTHS: u8 = 10;
pub const DEFAULT_MIN_THRESHOLD_TENTHS: u8 = 3;

// Prompt
pub const HELP_TOKEN: &str = "?";

/// Descriptions for each threshold tier, highest first.
pub const SIMILARITY_DESCRIPTIONS: [(u8, &str); 11] = [
    (10, "A match!"),
    (9, "Very similar (e.g., shared prefixes or suffixes)"),
    (8, "Pretty Similar (e.g., partial matches, similar patterns)"),
    (7, "Moderately similar (some overlap)"),
    (6, "Good similarity"),
    (5, "Decently similarity"),
    (4, "Reasonably related"),
    (3, "Less similarity"),
    (2, "Low similarity"),
    (1, "Minimally related"),
    (0, "Unlikely to be related"),
];

pub const UNLABELED_DESCRIPTION: &str = "Unlabeled similarity level";

/// How the bucket report is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Header names used to pull state and city values out of the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputColumns {
    pub state: String,
    pub city: String,
}

impl Default for InputColumns {
    fn default() -> Self {
        Self {
            state: DEFAULT_STATE_COLUMN.to_string(),
            city: DEFAULT_CITY_COLUMN.to_string(),
        }
    }
}

/// Everything one run needs. `min_threshold` left as `None` means ask the user.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub cache_path: PathBuf,
    pub columns: InputColumns,
    pub min_threshold: Option<Threshold>,
    pub format: OutputFormat,
    /// Draw a row progress bar on stderr (text output on a terminal only).
    pub progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
            columns: InputColumns::default(),
            min_threshold: None,
            format: OutputFormat::default(),
            progress: true,
        }
    }
}
