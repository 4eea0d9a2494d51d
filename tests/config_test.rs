//! Configuration defaults and backfill offset parsing.
//!
//! Run with: cargo test --test config_test

use chrono::TimeDelta;

use greenhouse_db::config::{Config, ConfigError, parse_offsets};

#[test]
fn defaults_match_documented_values() {
    let config = Config::default();

    assert_eq!(config.database_url, "sqlite://greenhouse.db?mode=rwc");
    assert_eq!(config.measurement_interval_seconds, 5);
    assert!(!config.backfill_enabled);
    assert!(config.clear_data_password.is_none());
    assert_eq!(config.bind_address(), "0.0.0.0:5000");
    assert_eq!(
        config.backfill_offsets,
        vec![
            TimeDelta::hours(2),
            TimeDelta::hours(8),
            TimeDelta::days(1),
            TimeDelta::days(3),
            TimeDelta::days(6),
        ]
    );
}

#[test]
fn offsets_tolerate_spaces_and_trailing_commas() {
    let offsets = parse_offsets(" 30, 90 ,").unwrap();
    assert_eq!(offsets, vec![TimeDelta::minutes(30), TimeDelta::minutes(90)]);
}

#[test]
fn offsets_reject_garbage_and_non_positive_values() {
    for raw in ["abc", "60,x", "0", "-15"] {
        let err = parse_offsets(raw).unwrap_err();
        let ConfigError::Invalid { var, value } = err;
        assert_eq!(var, "BACKFILL_OFFSETS_MINUTES");
        assert_eq!(value, raw);
    }
}
