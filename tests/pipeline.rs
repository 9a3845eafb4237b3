use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use place_similarity::{
    bucket_records, read_records, run, run_with_scorer, InputColumns, OutputFormat, RunConfig,
    ScoreCache, Threshold, Thresholds,
};

const CITIES: &str = "\
ID,CITY,STATE_NAME
1,New York City,New York
2,Atlanta,Georgia
3,Kansas City,Missouri
4,Kansas City,Kansas
5,,Ohio
6,Oklahoma City,Oklahoma
7,Indianapolis,Indiana
";

fn config_in(dir: &Path, minimum: u8) -> RunConfig {
    let input_path = dir.join("us_cities.csv");
    fs::write(&input_path, CITIES).unwrap();
    RunConfig {
        input_path,
        cache_path: dir.join("similarity_cache.csv"),
        columns: InputColumns::default(),
        min_threshold: Threshold::from_tenths(minimum),
        format: OutputFormat::Text,
        progress: false,
    }
}

fn run_to_string(config: &RunConfig) -> (String, place_similarity::RunSummary) {
    let mut input = Cursor::new(Vec::new());
    let mut out = Vec::new();
    let summary = run(config, &mut input, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), summary)
}

#[test]
fn second_run_reuses_cache_and_matches_first() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 3);

    let (first_report, first) = run_to_string(&config);
    assert_eq!(first.records, 6);
    assert_eq!(first.new_scores, 6);
    let cache_after_first = fs::read_to_string(&config.cache_path).unwrap();
    assert_eq!(cache_after_first.lines().count(), 7);

    let (second_report, second) = run_to_string(&config);
    assert_eq!(second.new_scores, 0);
    assert_eq!(second_report, first_report);
    assert_eq!(fs::read_to_string(&config.cache_path).unwrap(), cache_after_first);
}

#[test]
fn blank_city_never_reaches_buckets_or_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 0);

    let (report, summary) = run_to_string(&config);
    assert_eq!(summary.bucketed, 6);
    assert!(!report.contains("(Ohio)"));

    let cache = ScoreCache::load(&config.cache_path).unwrap();
    assert_eq!(cache.len(), 6);
    assert_eq!(cache.lookup("Ohio", ""), None);
}

#[test]
fn state_named_cities_land_in_top_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 9);

    let (report, _) = run_to_string(&config);
    assert!(report.starts_with("\n--- Cities with similarity ≥ 1.0 (A match!) ---\n"));
    assert!(report.contains("New York City (New York) — Score: 1.0"));
    assert!(report.contains("Kansas City (Kansas) — Score: 1.0"));
    assert!(report.contains("Oklahoma City (Oklahoma) — Score: 1.0"));
    assert!(!report.contains("Atlanta"));
    assert!(!report.contains("(Missouri)"));
}

#[test]
fn cached_score_decides_the_bucket() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 3);
    fs::write(&config.cache_path, "state,city,score\nGeorgia,Atlanta,0.73\n").unwrap();

    let mut cache = ScoreCache::load(&config.cache_path).unwrap();
    let records = read_records(&config.input_path, &config.columns).unwrap();
    let never = |_: &str, _: &str| 0.0;
    let ladder = Thresholds::from_minimum(Threshold::from_tenths(3).unwrap());
    let result = bucket_records(records, &mut cache, &never, &ladder);

    let seven = result.buckets.get(Threshold::from_tenths(7).unwrap());
    assert_eq!(seven.len(), 1);
    assert_eq!(seven[0].city, "Atlanta");
    assert!(result.buckets.get(Threshold::from_tenths(6).unwrap()).is_empty());
    assert!(result.buckets.get(Threshold::from_tenths(8).unwrap()).is_empty());
    assert_eq!(result.new_entries.len(), 5);
}

#[test]
fn prompt_is_used_when_no_threshold_given() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), 3);
    config.min_threshold = None;

    let mut input = Cursor::new("?\n0.9\n");
    let mut out = Vec::new();
    let fixed = |_: &str, _: &str| 0.95;
    let summary = run_with_scorer(&config, &fixed, &mut input, &mut out).unwrap();

    assert_eq!(summary.minimum, Threshold::from_tenths(9).unwrap());
    assert_eq!(summary.bucketed, 6);
    let mut rest = String::new();
    input.read_to_string(&mut rest).unwrap();
    assert!(rest.is_empty());

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("--- Similarity Descriptions ---"));
    assert!(text.contains(
        "--- Cities with similarity ≥ 0.9 (Very similar (e.g., shared prefixes or suffixes)) ---"
    ));
}

#[test]
fn halfway_prompt_value_keeps_lower_tier() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), 3);
    config.min_threshold = None;

    let mut input = Cursor::new("0.35\n");
    let mut out = Vec::new();
    let fixed = |_: &str, _: &str| 0.31;
    let summary = run_with_scorer(&config, &fixed, &mut input, &mut out).unwrap();

    assert_eq!(summary.minimum, Threshold::from_tenths(3).unwrap());
    assert_eq!(summary.bucketed, 6);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Atlanta (Georgia) — Score: 0.31"));
}

#[test]
fn missing_input_file_is_fatal_and_cache_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path(), 3);
    config.input_path = dir.path().join("missing.csv");

    let mut input = Cursor::new(Vec::new());
    let mut out = Vec::new();
    assert!(run(&config, &mut input, &mut out).is_err());
    assert!(!config.cache_path.exists());
}
