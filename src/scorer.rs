//! Character n-gram cosine similarity with a containment boost.
//!
//! The base score is the cosine between the n-gram count vectors of both
//! strings (lower-cased, whitespace runs collapsed). On top of that the state
//! name earns a boost when it appears inside the city name:
//! - as a whole word: [`WHOLE_WORD_BOOST`]
//! - as a plain substring: [`SUBSTRING_BOOST`]
//!
//! The boost only looks for the state inside the city, never the reverse, so
//! the score is not symmetric.

use std::cell::RefCell;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{NGRAM_MAX, NGRAM_MIN, SUBSTRING_BOOST, WHOLE_WORD_BOOST};

static WHITESPACE_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s\s+").unwrap());

/// Anything that can score a (state, city) pair into `[0, 1]`.
pub trait SimilarityScorer {
    fn score(&self, state: &str, city: &str) -> f64;
}

impl<F> SimilarityScorer for F
where
    F: Fn(&str, &str) -> f64,
{
    fn score(&self, state: &str, city: &str) -> f64 {
        self(state, city)
    }
}

/// N-gram cosine scorer with containment boosts.
#[derive(Debug, Clone)]
pub struct NgramScorer {
    pub ngram_min: usize,
    pub ngram_max: usize,
    pub whole_word_boost: f64,
    pub substring_boost: f64,
    /// Whole-word patterns keyed by lower-cased state name
    word_patterns: RefCell<HashMap<String, Option<Regex>>>,
}

impl Default for NgramScorer {
    fn default() -> Self {
        Self {
            ngram_min: NGRAM_MIN,
            ngram_max: NGRAM_MAX,
            whole_word_boost: WHOLE_WORD_BOOST,
            substring_boost: SUBSTRING_BOOST,
            word_patterns: RefCell::default(),
        }
    }
}

impl SimilarityScorer for NgramScorer {
    fn score(&self, state: &str, city: &str) -> f64 {
        let base = self.base_score(state, city);
        let boost = self.boost(state, city);
        (base + boost).clamp(0.0, 1.0)
    }
}

impl NgramScorer {
    /// Cosine similarity of the two n-gram count vectors. Zero when either
    /// string is too short to produce any n-gram.
    pub fn base_score(&self, a: &str, b: &str) -> f64 {
        let va = self.ngram_counts(a);
        let vb = self.ngram_counts(b);
        cosine_similarity(&va, &vb)
    }

    /// Containment boost for `state` appearing inside `city`. Whole-word match
    /// takes precedence; the two boosts never add up.
    pub fn boost(&self, state: &str, city: &str) -> f64 {
        let state_lower = state.to_lowercase();
        let city_lower = city.to_lowercase();

        if self.contains_whole_word(&city_lower, &state_lower) {
            self.whole_word_boost
        } else if city_lower.contains(&state_lower) {
            self.substring_boost
        } else {
            0.0
        }
    }

    fn contains_whole_word(&self, haystack: &str, needle: &str) -> bool {
        let mut patterns = self.word_patterns.borrow_mut();
        if let Some(pattern) = patterns.get(needle) {
            return pattern.as_ref().is_some_and(|re| re.is_match(haystack));
        }

        let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(needle))).ok();
        let matched = pattern.as_ref().is_some_and(|re| re.is_match(haystack));
        patterns.insert(needle.to_string(), pattern);
        matched
    }

    fn ngram_counts(&self, text: &str) -> HashMap<String, usize> {
        let normalized = WHITESPACE_RUN_REGEX
            .replace_all(&text.to_lowercase(), " ")
            .into_owned();
        let chars: Vec<char> = normalized.chars().collect();

        let mut counts = HashMap::new();
        for n in self.ngram_min.max(1)..=self.ngram_max {
            if n > chars.len() {
                break;
            }
            for window in chars.windows(n) {
                *counts.entry(window.iter().collect::<String>()).or_insert(0) += 1;
            }
        }
        counts
    }
}

/// Score a (state, city) pair with the default [`NgramScorer`].
pub fn score(state: &str, city: &str) -> f64 {
    NgramScorer::default().score(state, city)
}

fn cosine_similarity(a: &HashMap<String, usize>, b: &HashMap<String, usize>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    // Walk the smaller map for the dot product
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(gram, &x)| large.get(gram).map(|&y| (x * y) as f64))
        .sum();

    let norm = |v: &HashMap<String, usize>| {
        v.values().map(|&c| (c * c) as f64).sum::<f64>().sqrt()
    };
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}
