use passforge_core::{FieldSchema, FieldValue, GeneratedObject};
use passforge_generate::oracle::{CrackTime, CrackTimes, Feedback, StrengthEstimate};
use passforge_generate::{
    GenerationDriver, GenerationError, GenerationProfile, SamplingStrategy, StrengthOracle,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Scores by length so runs stay fast and deterministic.
struct LengthOracle;

impl StrengthOracle for LengthOracle {
    fn estimate(&self, password: &str) -> StrengthEstimate {
        let crack = CrackTime {
            seconds: password.len() as f64,
            display: format!("{} seconds", password.len()),
        };
        StrengthEstimate {
            score: if password.len() >= 15 { 4 } else { 2 },
            guesses: 1.0,
            guesses_log10: 0.0,
            sequence: Vec::new(),
            crack_times: CrackTimes {
                offline_fast_hashing: crack.clone(),
                offline_slow_hashing: crack.clone(),
                online_no_throttling: crack.clone(),
                online_throttled: crack,
            },
            feedback: Feedback::default(),
        }
    }
}

fn profile(seed: u64) -> GenerationProfile {
    GenerationProfile {
        length_min: 10,
        length_max: 20,
        seed: Some(seed),
        ..GenerationProfile::default()
    }
}

#[test]
fn profile_schema_pins_each_toggle() {
    let profile = GenerationProfile {
        numbers: false,
        ..GenerationProfile::default()
    };
    let schema = profile.fields_schema();

    let names: Vec<&str> = schema.fields().iter().map(|field| field.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "passwordLength",
            "easyToSay",
            "easyToRead",
            "allCharacters",
            "upperCase",
            "lowerCase",
            "numbers",
            "symbols"
        ]
    );
    assert_eq!(schema.get("passwordLength"), Some(&FieldSchema::number(10, 20)));
    assert_eq!(
        schema.get("numbers"),
        Some(&FieldSchema::Boolean {
            exclude_values: vec![true]
        })
    );
    assert_eq!(schema.get("symbols"), Some(&FieldSchema::fixed_boolean(true)));
}

#[test]
fn default_run_covers_every_length_once_per_copy() {
    let mut profile = profile(21);
    profile.copies_per_length = 2;
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let outcome = driver.run(&profile).expect("run");

    assert_eq!(outcome.report.distinct_combinations, 11);
    assert_eq!(outcome.report.objects_requested, 22);
    assert_eq!(outcome.rows.len(), 22);
    assert!(outcome.failures.is_empty());
    for row in &outcome.rows {
        assert_eq!(row.length, row.password.chars().count());
        let requested = row
            .values
            .get("passwordLength")
            .and_then(FieldValue::as_i64)
            .expect("length field");
        assert_eq!(row.length as i64, requested);
        assert_eq!(row.success, row.score == Some(4));
    }
    let histogram_total: u64 = outcome.report.score_histogram.values().sum();
    assert_eq!(histogram_total, 22);
}

#[test]
fn seeded_runs_are_reproducible() {
    let profile = profile(1234);
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let first = driver.run(&profile).expect("first run");
    let second = driver.run(&profile).expect("second run");

    assert_eq!(first.report.seed, 1234);
    assert_eq!(first.rows, second.rows);
}

#[test]
fn unseeded_runs_record_their_seed() {
    let profile = GenerationProfile {
        seed: None,
        ..profile(0)
    };
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let outcome = driver.run(&profile).expect("run");
    let replay = GenerationProfile {
        seed: Some(outcome.report.seed),
        ..profile.clone()
    };
    let replayed = driver.run(&replay).expect("replay");

    assert_eq!(outcome.rows, replayed.rows);
}

#[test]
fn failing_items_do_not_stop_the_batch() {
    let profile = profile(5);
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);
    let objects = vec![
        GeneratedObject::new().with("passwordLength", FieldValue::Int(12)),
        GeneratedObject::new().with("passwordLength", FieldValue::Int(3)),
        GeneratedObject::new()
            .with("passwordLength", FieldValue::Int(8))
            .with("easyToSay", FieldValue::Bool(false))
            .with("easyToRead", FieldValue::Bool(false))
            .with("allCharacters", FieldValue::Bool(false))
            .with("upperCase", FieldValue::Bool(false))
            .with("lowerCase", FieldValue::Bool(false))
            .with("numbers", FieldValue::Bool(false))
            .with("symbols", FieldValue::Bool(false)),
        GeneratedObject::new().with("passwordLength", FieldValue::Int(16)),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let (rows, failures) = driver.drive(&objects, &mut rng);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].length, 12);
    assert_eq!(rows[1].length, 16);
    assert_eq!(failures.len(), 2);
    assert_eq!(failures[0].values, objects[1]);
    assert!(failures[0].error.contains("between 6 and 700"));
    assert!(failures[1].error.contains("pool is empty"));
}

#[test]
fn run_reports_item_failures_in_outcome() {
    let profile = GenerationProfile {
        length_min: 4,
        length_max: 7,
        ..profile(8)
    };
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let outcome = driver.run(&profile).expect("run");

    assert_eq!(outcome.report.objects_requested, 4);
    assert_eq!(
        outcome.rows.len() as u64 + outcome.report.items_failed,
        outcome.report.objects_requested
    );
    assert!(outcome.rows.iter().all(|row| row.length >= 6));
    assert!(outcome.failures.iter().all(|failure| {
        failure
            .values
            .get("passwordLength")
            .and_then(FieldValue::as_i64)
            .is_some_and(|length| length < 6)
    }));
}

#[test]
fn unique_runs_beyond_the_space_fail_up_front() {
    let profile = GenerationProfile {
        unique: true,
        count: Some(12),
        ..profile(3)
    };
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let err = driver.run(&profile).expect_err("only eleven lengths exist");
    assert!(matches!(err, GenerationError::CombinationBudgetExceeded { .. }));
}

#[test]
fn exhaustive_strategy_visits_every_length() {
    let profile = GenerationProfile {
        strategy: SamplingStrategy::Exhaustive,
        ..profile(17)
    };
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let outcome = driver.run(&profile).expect("run");

    let mut lengths: Vec<usize> = outcome.rows.iter().map(|row| row.length).collect();
    lengths.sort_unstable();
    assert_eq!(lengths, (10..=20).collect::<Vec<_>>());
}

#[test]
fn row_ids_are_unique_v4() {
    let profile = profile(99);
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let outcome = driver.run(&profile).expect("run");

    let mut ids: Vec<_> = outcome.rows.iter().map(|row| row.id).collect();
    assert!(ids.iter().all(|id| id.get_version_num() == 4));
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), outcome.rows.len());
}

#[test]
fn explicit_count_samples_beyond_product_limit() {
    let mut profile = GenerationProfile {
        unique: true,
        count: Some(3),
        ..profile(44)
    };
    profile.combinator.max_product = 5;
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let outcome = driver.run(&profile).expect("run");

    assert_eq!(outcome.report.distinct_combinations, 11);
    assert_eq!(outcome.rows.len(), 3);
}

#[test]
fn default_count_is_bounded_by_product_limit() {
    let mut profile = profile(44);
    profile.combinator.max_product = 5;
    let driver = GenerationDriver::with_oracle(&profile, LengthOracle);

    let err = driver.run(&profile).expect_err("eleven combinations exceed five");
    assert!(matches!(err, GenerationError::CombinationLimit { size: 11, limit: 5 }));
}
