//! Tour integration tests.
//!
//! Runs the full walkthrough against the fixture database and checks the
//! stop-at-first-failure behavior against a database that is missing a
//! table the later lessons need.

use sqltour::config::ConnectionConfig;
use sqltour::db::{DatabaseClient, SqliteClient};
use sqltour::error::QueryReason;
use sqltour::render::OutputFormat;
use sqltour::tour::{lesson, lessons, Tour};

use super::seeded_client;

#[tokio::test]
async fn test_run_all_lessons_against_fixtures() {
    let client = seeded_client().await;
    let tour = Tour::new(&client, OutputFormat::Text);

    let mut out = Vec::new();
    tour.run_all(&mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    for l in lessons() {
        assert!(
            text.contains(&format!("== Lesson {}: {} ==", l.number, l.title)),
            "missing heading for lesson {}",
            l.number
        );
    }

    // Lesson 1 output includes the San Francisco employees.
    assert!(text.contains("Murphy"));
    assert!(text.contains("Firrelli"));
    // Lesson 4 output includes the nested-aggregate column.
    assert!(text.contains("averagePayment"));
    // The French office never shows up in the USA-filtered lessons.
    assert!(!text.contains("Hernandez"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_single_lesson_output() {
    let client = seeded_client().await;
    let tour = Tour::new(&client, OutputFormat::Text);

    let mut out = Vec::new();
    tour.run_lesson(lesson(1).unwrap(), &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("== Lesson 1: Joining tables =="));
    assert!(text.contains("officeCode"));
    assert!(text.contains("5 rows"));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_json_output_per_lesson() {
    let client = seeded_client().await;
    let tour = Tour::new(&client, OutputFormat::Json);

    let mut out = Vec::new();
    tour.run_lesson(lesson(2).unwrap(), &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    let parsed: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
    assert_eq!(parsed["columns"][0]["name"], "lastName");
    assert_eq!(parsed["rows"].as_array().unwrap().len(), 5);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_tour_stops_at_first_failure() {
    // A database without the payments table: lessons 1-3 work, lesson 4 fails.
    let client = SqliteClient::connect(&ConnectionConfig::in_memory())
        .await
        .unwrap();
    client
        .execute_batch(
            "CREATE TABLE offices (officeCode TEXT PRIMARY KEY, city TEXT, country TEXT);
             CREATE TABLE employees (
                 employeeNumber INTEGER PRIMARY KEY,
                 lastName TEXT, firstName TEXT, officeCode TEXT
             );
             CREATE TABLE customers (
                 customerNumber INTEGER PRIMARY KEY,
                 customerName TEXT, country TEXT, salesRepEmployeeNumber INTEGER
             );",
        )
        .await
        .unwrap();

    let tour = Tour::new(&client, OutputFormat::Text);
    let mut out = Vec::new();
    let err = tour.run_all(&mut out).await.unwrap_err();
    assert_eq!(err.query_reason(), Some(QueryReason::Schema));

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("== Lesson 3:"));
    assert!(!text.contains("== Lesson 4:"));
    assert!(!text.contains("== Lesson 5:"));

    client.close().await.unwrap();
}
