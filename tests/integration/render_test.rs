//! Rendering integration tests over real query results.

use sqltour::query::QueryRunner;
use sqltour::render;
use sqltour::db::DatabaseClient;

use super::seeded_client;

#[tokio::test]
async fn test_text_rendering_of_real_result() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner
        .run("SELECT city, country FROM offices ORDER BY officeCode")
        .await
        .unwrap();
    let rendered = render::render_text(&outcome.table);

    assert!(rendered.contains("city"));
    assert!(rendered.contains("country"));
    assert!(rendered.contains("San Francisco"));
    assert!(rendered.contains("Paris"));
    // Header plus two data rows, plus table borders.
    assert!(rendered.lines().count() >= 3);

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_json_rendering_round_trips() {
    let client = seeded_client().await;
    let runner = QueryRunner::new(&client);

    let outcome = runner
        .run("SELECT customerName, salesRepEmployeeNumber FROM customers ORDER BY customerNumber")
        .await
        .unwrap();
    let rendered = render::render_json(&outcome.table).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

    let rows = parsed["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    // Customer 121 has no sales rep; its cell must be a JSON null.
    assert!(rows[4][1].is_null());

    client.close().await.unwrap();
}
