//! Driver behaviour against a scripted engine.

use std::time::Duration;

use futures::future::join_all;
use oxide_driver::mock::MockManager;
use oxide_driver::DriverError;
use oxide_sql_core::{Filter, Introspect, Query, Row, SelectQuery, SqlValue};
use oxide_sql_firebird::{FirebirdConfig, FirebirdDialect, FirebirdDriver};

fn driver(manager: &MockManager, pool_size: usize) -> FirebirdDriver<MockManager> {
    FirebirdConfig::new("employee.fdb")
        .with_max_pool_size(pool_size)
        .with_acquire_timeout(Duration::from_secs(5))
        .build_driver(manager.clone())
}

async fn wait_until(condition: impl Fn() -> bool + Send) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_connection_selects_from_rdb_database() {
    let manager = MockManager::new();
    let driver = driver(&manager, 2);

    driver.test_connection().await.unwrap();
    assert_eq!(manager.executed(), ["SELECT 1 FROM RDB$DATABASE"]);
}

#[tokio::test]
async fn test_query_error_is_surfaced_and_connection_returned() {
    let manager = MockManager::new();
    manager.fail(
        "SELECT * FROM MISSING",
        Some("335544580"),
        "Table unknown MISSING",
    );
    let driver = driver(&manager, 2);

    let err = driver
        .query(&Query::new("SELECT * FROM MISSING"))
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "query error [335544580]: Table unknown MISSING"
    );
    assert!(!err.is_retryable());
    assert_eq!(driver.pool().status().available, 2);
    assert_eq!(driver.pool().status().idle, 1);
}

#[tokio::test]
async fn test_compiled_query_binds_parameters_in_order() {
    let manager = MockManager::new();
    let driver = driver(&manager, 1);

    let query = SelectQuery::from("EMPLOYEE")
        .filter(Filter::eq("DEPT_NO", "600"))
        .filter(Filter::contains("LAST_NAME", "son"))
        .limit(5)
        .build(driver.dialect());
    let rows = driver.query(&query).await.unwrap();

    assert_eq!(
        query.sql(),
        "SELECT * FROM EMPLOYEE WHERE DEPT_NO = ? AND UPPER(LAST_NAME) SIMILAR TO '%' || ? || '%' \
         ESCAPE '\\' ROWS 1 TO 6"
    );
    assert_eq!(
        query.params(),
        [SqlValue::Text("600".into()), SqlValue::Text("SON".into())]
    );
    assert_eq!(rows[0].get("params"), Some(&SqlValue::Int(2)));
}

#[tokio::test]
async fn test_introspect_empty_catalog() {
    let dialect = FirebirdDialect::new();
    let manager = MockManager::new();
    manager
        .respond(dialect.columns_query(), vec![])
        .respond(dialect.primary_keys_query(None), vec![])
        .respond(dialect.foreign_keys_query(None), vec![]);
    let driver = driver(&manager, 2);

    let snapshot = driver.introspect(None).await.unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(manager.executed().len(), 3);
}

#[tokio::test]
async fn test_introspect_trims_catalog_padding() {
    let dialect = FirebirdDialect::new();
    let condition = "rc.RDB$RELATION_NAME = 'EMPLOYEE'";
    let manager = MockManager::new();
    manager
        .respond(
            dialect.columns_query(),
            vec![
                Row::new()
                    .with("table_schema", "SYSDBA")
                    .with("table_name", "EMPLOYEE")
                    .with("column_name", "EMP_NO")
                    .with("data_type", "SHORT"),
                Row::new()
                    .with("table_schema", "SYSDBA")
                    .with("table_name", "EMPLOYEE")
                    .with("column_name", "DEPT_NO")
                    .with("data_type", "TEXT"),
            ],
        )
        .respond(dialect.primary_keys_query(Some(condition)), vec![])
        .respond(
            dialect.foreign_keys_query(Some(condition)),
            vec![Row::new()
                .with("table_schema", "SYSDBA                         ")
                .with("table_name", "EMPLOYEE                       ")
                .with("column_name", "DEPT_NO                        ")
                .with("target_table", "DEPARTMENT                     ")
                .with("target_column", "DEPT_NO                        ")],
        );
    let driver = driver(&manager, 2);

    let snapshot = driver.introspect(Some(condition)).await.unwrap();
    assert_eq!(snapshot.table_names(), ["EMPLOYEE"]);
    assert!(snapshot.primary_keys.is_empty());
    let fk = &snapshot.foreign_keys[0];
    assert_eq!(fk.table_name, "EMPLOYEE");
    assert_eq!(fk.target_table, "DEPARTMENT");
    assert_eq!(fk.target_column, "DEPT_NO");
}

#[tokio::test]
async fn test_third_query_waits_for_a_free_connection() {
    let manager = MockManager::new();
    manager.close_gate();
    let driver = driver(&manager, 2);

    let queries = [
        Query::new("SELECT COUNT(*) FROM EMPLOYEE"),
        Query::new("SELECT COUNT(*) FROM DEPARTMENT"),
        Query::new("SELECT COUNT(*) FROM PROJECT"),
    ];
    let run = join_all(queries.iter().map(|q| driver.query(q)));
    let control = async {
        wait_until(|| manager.active() == 2).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(manager.executed().len(), 2);
        assert_eq!(driver.pool().status().available, 0);

        manager.open_gate(1);
        wait_until(|| manager.executed().len() == 3).await;
        manager.open_gate(2);
    };
    let (results, ()) = tokio::join!(run, control);

    for (query, result) in queries.iter().zip(results) {
        let rows = result.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("sql").and_then(SqlValue::as_str), Some(query.sql()));
    }
    assert_eq!(manager.max_active(), 2);
    assert_eq!(manager.opened(), 2);
    assert_eq!(driver.pool().status().available, 2);
}

#[tokio::test]
async fn test_release_rejects_later_queries() {
    let manager = MockManager::new();
    let driver = driver(&manager, 2);
    driver.test_connection().await.unwrap();

    driver.release().await;
    let err = driver.test_connection().await.unwrap_err();
    assert!(matches!(err, DriverError::PoolClosed));
    assert_eq!(manager.closed(), 1);
}
