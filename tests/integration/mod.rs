//! Integration tests for sqltour.
//!
//! Shared fixtures: a miniature classicmodels database with two offices,
//! seven employees, five customers, and five payments. Office '1' has five
//! employees, office '4' only two, so the aggregate-filter lesson has
//! something to exclude.

pub mod query_test;
pub mod render_test;
pub mod tour_test;

use sqltour::config::ConnectionConfig;
use sqltour::db::{DatabaseClient, SqliteClient};

pub const SCHEMA: &str = "\
CREATE TABLE offices (
    officeCode TEXT NOT NULL PRIMARY KEY,
    city TEXT NOT NULL,
    country TEXT NOT NULL
);

CREATE TABLE employees (
    employeeNumber INTEGER NOT NULL PRIMARY KEY,
    lastName TEXT NOT NULL,
    firstName TEXT NOT NULL,
    officeCode TEXT NOT NULL REFERENCES offices(officeCode)
);

CREATE TABLE customers (
    customerNumber INTEGER NOT NULL PRIMARY KEY,
    customerName TEXT NOT NULL,
    country TEXT NOT NULL,
    salesRepEmployeeNumber INTEGER REFERENCES employees(employeeNumber)
);

CREATE TABLE payments (
    customerNumber INTEGER NOT NULL REFERENCES customers(customerNumber),
    checkNumber TEXT NOT NULL,
    amount REAL NOT NULL,
    PRIMARY KEY (customerNumber, checkNumber)
);
";

pub const FIXTURES: &str = "\
INSERT INTO offices (officeCode, city, country) VALUES
    ('1', 'San Francisco', 'USA'),
    ('4', 'Paris', 'France');

INSERT INTO employees (employeeNumber, lastName, firstName, officeCode) VALUES
    (1002, 'Murphy', 'Diane', '1'),
    (1056, 'Patterson', 'Mary', '1'),
    (1076, 'Firrelli', 'Jeff', '1'),
    (1088, 'Patterson', 'William', '1'),
    (1102, 'Bondur', 'Gerard', '1'),
    (1337, 'Bondur', 'Loui', '4'),
    (1370, 'Hernandez', 'Gerard', '4');

INSERT INTO customers (customerNumber, customerName, country, salesRepEmployeeNumber) VALUES
    (103, 'Atelier graphique', 'France', 1370),
    (112, 'Signal Gift Stores', 'USA', 1002),
    (114, 'Mini Gifts Distributors', 'USA', 1056),
    (119, 'La Rochelle Gifts', 'France', 1337),
    (121, 'Baane Mini Imports', 'USA', NULL);

INSERT INTO payments (customerNumber, checkNumber, amount) VALUES
    (103, 'HQ336336', 1000.0),
    (103, 'JM555205', 2000.0),
    (112, 'BO864823', 3000.0),
    (114, 'GG31455', 4000.0),
    (114, 'MA765515', 6000.0);
";

/// In-memory database with the full fixture set.
pub async fn seeded_client() -> SqliteClient {
    let client = SqliteClient::connect(&ConnectionConfig::in_memory())
        .await
        .expect("open in-memory database");
    client.execute_batch(SCHEMA).await.expect("create schema");
    client
        .execute_batch(FIXTURES)
        .await
        .expect("insert fixtures");
    client
}

/// In-memory database with the schema but no rows.
pub async fn empty_client() -> SqliteClient {
    let client = SqliteClient::connect(&ConnectionConfig::in_memory())
        .await
        .expect("open in-memory database");
    client.execute_batch(SCHEMA).await.expect("create schema");
    client
}
