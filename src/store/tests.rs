use rusqlite::Connection;

use super::*;
use crate::timetable::{MonthInput, ParseOptions, day_code, parse_and_validate_report};

fn memory_store() -> Connection {
    let connection = Connection::open_in_memory().expect("in-memory sqlite should open");
    ensure_schema(&connection).expect("schema should apply");
    connection
}

fn april_2025_report() -> ParseReport {
    let mut weekday = chrono::Weekday::Tue;
    let mut lines = Vec::new();
    for date in 1..=30 {
        lines.push(format!(
            "{date} {} 4.52 5.30 6.20 10.00 1.05 1.30 5.02 5.30 7.48 9.10 9.30",
            day_code(weekday)
        ));
        weekday = weekday.succ();
    }

    parse_and_validate_report(
        &lines.join("\n"),
        2025,
        &MonthInput::from("April"),
        &ParseOptions::default(),
    )
    .expect("fixture month should validate")
}

fn source(sha256: &str) -> SourceRecord {
    SourceRecord {
        kind: "text".to_string(),
        path: "april.txt".to_string(),
        sha256: sha256.to_string(),
    }
}

#[test]
fn accepted_timetable_round_trips_prayer_data() {
    let connection = memory_store();
    let report = april_2025_report();
    upsert_accepted(&connection, &report, &source("abc")).unwrap();

    let data = load_prayer_data(&connection, 2025, 4).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&data).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(30));
    assert_eq!(value[0]["fajr"]["start"], "04.52");
    assert_eq!(value[29]["day"], "WED");

    let summaries = list_timetables(&connection).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].status, STATUS_ACCEPTED);
    assert_eq!(summaries[0].row_count, 30);
}

#[test]
fn rejection_clears_previous_prayer_data() {
    let connection = memory_store();
    upsert_accepted(&connection, &april_2025_report(), &source("abc")).unwrap();
    record_rejection(
        &connection,
        2025,
        4,
        &source("def"),
        "row count mismatch: expected 30, found 29",
    )
    .unwrap();

    assert!(load_prayer_data(&connection, 2025, 4).unwrap().is_none());
    let summaries = list_timetables(&connection).unwrap();
    assert_eq!(summaries[0].status, STATUS_REJECTED);
    assert_eq!(summaries[0].row_count, 0);
    assert!(summaries[0].error.as_deref().unwrap_or_default().contains("row count"));
}

#[test]
fn already_populated_requires_accepted_rows_from_same_source() {
    let connection = memory_store();
    assert!(!already_populated(&connection, 2025, 4, "abc").unwrap());

    upsert_accepted(&connection, &april_2025_report(), &source("abc")).unwrap();
    assert!(already_populated(&connection, 2025, 4, "abc").unwrap());
    assert!(!already_populated(&connection, 2025, 4, "changed").unwrap());
    assert!(!already_populated(&connection, 2025, 5, "abc").unwrap());

    record_rejection(&connection, 2025, 4, &source("abc"), "bad scan").unwrap();
    assert!(!already_populated(&connection, 2025, 4, "abc").unwrap());
}

#[test]
fn timetables_are_listed_in_calendar_order() {
    let connection = memory_store();
    record_rejection(&connection, 2025, 6, &source("x"), "unknown month").unwrap();
    upsert_accepted(&connection, &april_2025_report(), &source("abc")).unwrap();
    record_rejection(&connection, 2024, 12, &source("y"), "bad scan").unwrap();

    let order = list_timetables(&connection)
        .unwrap()
        .into_iter()
        .map(|summary| (summary.year, summary.month))
        .collect::<Vec<_>>();
    assert_eq!(order, vec![(2024, 12), (2025, 4), (2025, 6)]);
}
