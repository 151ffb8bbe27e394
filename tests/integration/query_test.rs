//! Query execution integration tests.
//!
//! Covers the core contract of the query runner: projection fidelity,
//! rectangular rows, read idempotence, reason-tagged failures, and the two
//! walkthrough scenarios (join over USING, aggregate-filtered subquery).

use pretty_assertions::assert_eq;
use sqltour::config::ConnectionConfig;
use sqltour::db::{DatabaseClient, SqliteClient, Value};
use sqltour::error::QueryReason;
use sqltour::query::QueryRunner;
use sqltour::tour;

use super::{empty_client, seeded_client};

#[tokio::test]
async fn test_columns_match_projection_in_order() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner
        .run("SELECT lastName, firstName, officeCode FROM employees")
        .await
        .unwrap();

    assert_eq!(
        outcome.table.column_names(),
        vec!["lastName", "firstName", "officeCode"]
    );

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_no_short_rows() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner
        .run("SELECT employeeNumber, lastName, firstName, officeCode FROM employees")
        .await
        .unwrap();

    let width = outcome.table.columns.len();
    assert_eq!(width, 4);
    for row in &outcome.table.rows {
        assert_eq!(row.len(), width);
    }

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_repeated_read_is_identical() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);
    let sql = "SELECT lastName, officeCode FROM employees ORDER BY employeeNumber";

    let first = runner.run(sql).await.unwrap();
    let second = runner.run(sql).await.unwrap();

    assert_eq!(first.table, second.table);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_unknown_column_is_schema_error() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let err = runner
        .run("SELECT nonexistent_column FROM employees")
        .await
        .unwrap_err();

    assert_eq!(err.query_reason(), Some(QueryReason::Schema));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_closed_connection_is_connection_error() {
    let client = seeded_client().await;
    client.close().await.unwrap();

    let runner = QueryRunner::new(&client);
    let err = runner.run("SELECT 1").await.unwrap_err();

    assert_eq!(err.query_reason(), Some(QueryReason::Connection));
}

#[tokio::test]
async fn test_join_using_scenario() {
    // The canonical one-office, one-employee scenario.
    let client = SqliteClient::connect(&ConnectionConfig::in_memory())
        .await
        .unwrap();
    client
        .execute_batch(
            "CREATE TABLE offices (officeCode TEXT PRIMARY KEY, country TEXT);
             CREATE TABLE employees (
                 employeeNumber INTEGER PRIMARY KEY,
                 lastName TEXT,
                 firstName TEXT,
                 officeCode TEXT
             );
             INSERT INTO offices VALUES ('1', 'USA');
             INSERT INTO employees VALUES (1, 'Doe', 'Jane', '1');",
        )
        .await
        .unwrap();

    let runner = QueryRunner::new(&client);
    let outcome = runner
        .run(
            "SELECT lastName, firstName, officeCode \
             FROM employees JOIN offices USING(officeCode) \
             WHERE country = 'USA'",
        )
        .await
        .unwrap();

    let table = &outcome.table;
    assert_eq!(table.row_count(), 1);
    assert_eq!(
        table.column_names(),
        vec!["lastName", "firstName", "officeCode"]
    );
    assert_eq!(table.get(0, "lastName"), Some(&Value::from("Doe")));
    assert_eq!(table.get(0, "firstName"), Some(&Value::from("Jane")));
    assert_eq!(table.get(0, "officeCode"), Some(&Value::from("1")));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_having_count_excludes_small_office() {
    // Office '4' has two employees and must not survive HAVING COUNT >= 5.
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner.run(tour::lesson(3).unwrap().sql).await.unwrap();

    assert!(!outcome.table.is_empty());
    for row in 0..outcome.table.row_count() {
        assert_eq!(
            outcome.table.get(row, "officeCode"),
            Some(&Value::from("1"))
        );
    }

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_nested_aggregation_averages_the_averages() {
    // Per-customer averages are 1500, 3000, 5000; their mean is 3166.66...
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner.run(tour::lesson(4).unwrap().sql).await.unwrap();

    assert_eq!(outcome.table.row_count(), 1);
    assert_eq!(outcome.table.column_names(), vec!["averagePayment"]);
    match outcome.table.get(0, "averagePayment") {
        Some(Value::Float(avg)) => assert!((avg - 3166.666_666_666_666_5).abs() < 0.001),
        other => panic!("expected a float average, got {other:?}"),
    }

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_foreign_key_subquery_finds_sales_reps() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner.run(tour::lesson(5).unwrap().sql).await.unwrap();

    // USA customers are served by employees 1002 and 1056.
    let idx = outcome.table.column_index("employeeNumber").unwrap();
    let mut reps: Vec<i64> = outcome
        .table
        .rows
        .iter()
        .filter_map(|row| match &row[idx] {
            Value::Int(n) => Some(*n),
            _ => None,
        })
        .collect();
    reps.sort_unstable();
    assert_eq!(reps, vec![1002, 1056]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_empty_result_keeps_projection() {
    let client = empty_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner
        .run("SELECT lastName, firstName FROM employees WHERE 1 = 0")
        .await
        .unwrap();

    assert!(outcome.table.is_empty());
    assert_eq!(outcome.table.column_names(), vec!["lastName", "firstName"]);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_write_statement_is_refused_and_nothing_changes() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let err = runner.run("DELETE FROM employees").await.unwrap_err();
    assert_eq!(err.query_reason(), Some(QueryReason::ReadOnly));

    let outcome = runner
        .run("SELECT COUNT(*) AS n FROM employees")
        .await
        .unwrap();
    assert_eq!(outcome.table.get(0, "n"), Some(&Value::Int(7)));

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_malformed_sql_surfaces_engine_syntax_error() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let err = runner.run("SELEC * FROM employees").await.unwrap_err();
    assert_eq!(err.query_reason(), Some(QueryReason::Syntax));

    client.close().await.unwrap();
}
