//! History query engine: selection modes, label granularity, empty results.
//!
//! Run with: cargo test --test history_test

mod common;

use chrono::{Duration, Utc};

use common::{at, memory_store, reading};
use greenhouse_db::history::{self, Granularity, HistoryQuery, Selection, SensorSeries};
use greenhouse_db::reading::SensorColumn;

#[test]
fn granularity_switches_above_one_day() {
    assert_eq!(Granularity::for_hours(1), Granularity::HourMinute);
    assert_eq!(Granularity::for_hours(24), Granularity::HourMinute);
    assert_eq!(Granularity::for_hours(25), Granularity::DayMonth);
    assert_eq!(Granularity::for_hours(24 * 7), Granularity::DayMonth);
}

#[test]
fn labels_use_the_granularity_pattern() {
    let ts = at(2025, 10, 19, 14, 5, 59);
    assert_eq!(Granularity::HourMinute.label(ts, &Utc), "14:05");
    assert_eq!(Granularity::DayMonth.label(ts, &Utc), "19-10");
}

#[test]
fn query_constructors_pick_the_selection() {
    let window = HistoryQuery::new(SensorColumn::Humidity, 6, None);
    assert_eq!(window.selection, Selection::ByWindow { hours: 6 });

    let tail = HistoryQuery::new(SensorColumn::Humidity, 8, Some(15));
    assert_eq!(tail.selection, Selection::ByTail { limit: 15 });
    assert_eq!(tail.granularity(), Granularity::HourMinute);

    let week = HistoryQuery::window(SensorColumn::Humidity, 168);
    assert_eq!(week.granularity(), Granularity::DayMonth);
}

#[test]
fn series_serializes_values_as_data() {
    let series = SensorSeries {
        labels: vec!["10:00".into()],
        values: vec![25.5],
    };
    let json = serde_json::to_value(&series).unwrap();
    assert_eq!(json, serde_json::json!({ "labels": ["10:00"], "data": [25.5] }));
}

#[tokio::test]
async fn empty_store_gives_empty_series() {
    let store = memory_store().await;
    let now = at(2025, 5, 1, 12, 0, 0);

    for query in [
        HistoryQuery::window(SensorColumn::Temperature, 24),
        HistoryQuery::tail(SensorColumn::PhLevel, 8, 15),
    ] {
        let series = history::history_in(&store, &query, now, &Utc).await.unwrap();
        assert!(series.is_empty());
        assert!(series.labels.is_empty());
        assert_eq!(series, SensorSeries::default());
    }
}

#[tokio::test]
async fn window_series_is_labelled_by_minute() {
    let store = memory_store().await;
    let now = at(2025, 5, 1, 12, 0, 0);

    store.insert(&reading(now - Duration::minutes(10), 27.0)).await.unwrap();
    store.insert(&reading(now - Duration::hours(30), 99.0)).await.unwrap();
    store.insert(&reading(now - Duration::minutes(40), 26.0)).await.unwrap();

    let query = HistoryQuery::window(SensorColumn::Temperature, 1);
    let series = history::history_in(&store, &query, now, &Utc).await.unwrap();

    assert_eq!(series.labels, vec!["11:20", "11:50"]);
    assert_eq!(series.values, vec![26.0, 27.0]);
    assert_eq!(series.labels.len(), series.values.len());
}

#[tokio::test]
async fn long_window_series_is_labelled_by_day() {
    let store = memory_store().await;
    let now = at(2025, 5, 10, 12, 0, 0);

    for days in [6, 3, 1] {
        store.insert(&reading(now - Duration::days(days), days as f64)).await.unwrap();
    }

    let query = HistoryQuery::window(SensorColumn::Temperature, 24 * 7);
    let series = history::history_in(&store, &query, now, &Utc).await.unwrap();

    assert_eq!(series.labels, vec!["04-05", "07-05", "09-05"]);
    assert_eq!(series.values, vec![6.0, 3.0, 1.0]);
}

#[tokio::test]
async fn tail_series_caps_point_count() {
    let store = memory_store().await;
    let now = at(2025, 5, 1, 12, 0, 0);

    for i in 0..20 {
        store
            .insert(&reading(now - Duration::minutes(i * 5), i as f64))
            .await
            .unwrap();
    }

    let query = HistoryQuery::tail(SensorColumn::Temperature, 8, 15);
    let series = history::history_in(&store, &query, now, &Utc).await.unwrap();

    assert_eq!(series.len(), 15);
    assert_eq!(series.labels.first().map(String::as_str), Some("10:50"));
    assert_eq!(series.labels.last().map(String::as_str), Some("12:00"));
    let expected: Vec<f64> = (0..15).rev().map(|i| i as f64).collect();
    assert_eq!(series.values, expected);
}

#[tokio::test]
async fn history_for_uses_local_labels() {
    let store = memory_store().await;
    let now = Utc::now();
    store.insert(&reading(now - Duration::minutes(1), 24.0)).await.unwrap();

    let query = HistoryQuery::window(SensorColumn::Temperature, 1);
    let series = history::history_for(&store, &query, now).await.unwrap();

    let expected = Granularity::HourMinute.label(now - Duration::minutes(1), &chrono::Local);
    assert_eq!(series.labels, vec![expected]);
}
