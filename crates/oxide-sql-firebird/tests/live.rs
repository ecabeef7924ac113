//! Tests against a running Firebird server.
//!
//! Ignored by default. Point `FIREBIRD_DATABASE` at a database and run
//! `cargo test -p oxide-sql-firebird -- --ignored`; `FIREBIRD_HOST`,
//! `FIREBIRD_PORT`, `FIREBIRD_USER` and `FIREBIRD_PASSWORD` override the
//! connection defaults.

use std::env;

use oxide_driver::DriverError;
use oxide_sql_core::{Filter, Query, SelectQuery, SqlValue};
use oxide_sql_firebird::{FirebirdConfig, FirebirdDriver};

fn driver_from_env() -> Option<FirebirdDriver> {
    let database = env::var("FIREBIRD_DATABASE").ok()?;
    let mut config = FirebirdConfig::new(database).with_max_pool_size(2);
    if let Ok(host) = env::var("FIREBIRD_HOST") {
        config.host = host;
    }
    if let Some(port) = env::var("FIREBIRD_PORT").ok().and_then(|p| p.parse().ok()) {
        config.port = port;
    }
    if let Ok(user) = env::var("FIREBIRD_USER") {
        config.user = user;
    }
    if let Ok(password) = env::var("FIREBIRD_PASSWORD") {
        config.password = password;
    }
    Some(config.into_driver())
}

#[tokio::test]
#[ignore = "needs a Firebird server; set FIREBIRD_DATABASE"]
async fn test_live_session_round_trip() {
    let Some(driver) = driver_from_env() else {
        return;
    };
    driver.test_connection().await.unwrap();

    let rows = driver
        .query(&Query::new("SELECT CAST(? AS INTEGER) AS N FROM RDB$DATABASE").bind(41))
        .await
        .unwrap();
    assert_eq!(rows[0].get("N"), Some(&SqlValue::Int(41)));

    driver.introspect(None).await.unwrap();
    driver.release().await;
}

#[tokio::test]
#[ignore = "needs a Firebird server; set FIREBIRD_DATABASE"]
async fn test_live_match_ignores_case() {
    let Some(driver) = driver_from_env() else {
        return;
    };
    let query = SelectQuery::from("(SELECT 'Johnson' AS LAST_NAME FROM RDB$DATABASE) t")
        .column("LAST_NAME")
        .filter(Filter::contains("LAST_NAME", "son"))
        .build(driver.dialect());
    let rows = driver.query(&query).await.unwrap();
    assert_eq!(rows.len(), 1);
    driver.release().await;
}

#[tokio::test]
#[ignore = "needs a Firebird server; set FIREBIRD_DATABASE"]
async fn test_live_engine_error_carries_sqlcode() {
    let Some(driver) = driver_from_env() else {
        return;
    };
    let err = driver
        .query(&Query::new("SELECT * FROM NO_SUCH_TABLE"))
        .await
        .unwrap_err();
    let DriverError::Query { code, .. } = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(code.as_deref(), Some("-204"));
    assert_eq!(driver.pool().status().idle, 1);
    driver.release().await;
}
