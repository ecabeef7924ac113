//! The adapter facade handed to a query host.

use oxide_sql_core::{
    ColumnInfo, DecodeError, Dialect, ForeignKeyInfo, Introspect, PrimaryKeyInfo, Query, Row,
    SchemaSnapshot,
};
use tracing::{debug, info};

use crate::config::PoolConfig;
use crate::connection::ConnectionManager;
use crate::error::Result;
use crate::pool::Pool;

/// A dialect paired with a connection pool.
///
/// The host compiles SQL with [`Driver::dialect`] and runs it with
/// [`Driver::query`]; schema discovery goes through
/// [`Driver::introspect`]. The driver owns its pool: there is no global
/// pool state, and [`Driver::release`] shuts it down.
///
/// # Example
///
/// ```rust,ignore
/// use oxide_driver::{Driver, PoolConfig};
/// use oxide_sql_core::{Filter, SelectQuery};
///
/// let driver = Driver::new(dialect, manager, PoolConfig::default());
/// driver.test_connection().await?;
///
/// let query = SelectQuery::from("EMPLOYEE")
///     .filter(Filter::contains("LAST_NAME", "son"))
///     .limit(10)
///     .build(driver.dialect());
/// let rows = driver.query(&query).await?;
///
/// let schema = driver.introspect(None).await?;
/// driver.release().await;
/// ```
pub struct Driver<D, M: ConnectionManager> {
    dialect: D,
    pool: Pool<M>,
}

impl<D, M: ConnectionManager> Driver<D, M> {
    /// Creates a driver and its pool.
    #[must_use]
    pub fn new(dialect: D, manager: M, config: PoolConfig) -> Self {
        Self {
            dialect,
            pool: Pool::new(manager, config),
        }
    }

    /// The dialect used to render SQL for this engine.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &Pool<M> {
        &self.pool
    }
}

impl<D: Dialect, M: ConnectionManager> Driver<D, M> {
    /// Runs a query on a pooled connection. The connection is released on
    /// success and on failure alike.
    ///
    /// # Errors
    ///
    /// Pool errors, the query timeout, or the engine's error.
    pub async fn query(&self, query: &Query) -> Result<Vec<Row>> {
        self.pool.execute(query).await
    }

    /// Shuts the pool down; later queries fail with
    /// [`DriverError::PoolClosed`](crate::DriverError::PoolClosed).
    pub async fn release(&self) {
        info!("Releasing driver");
        self.pool.close().await;
    }

    /// Acquires a connection, runs the dialect's test query and releases
    /// the connection.
    ///
    /// # Errors
    ///
    /// Any failure to acquire the connection or to run the query.
    pub async fn test_connection(&self) -> Result<()> {
        debug!(dialect = self.dialect.name(), "Testing connection");
        self.pool
            .execute(&Query::new(self.dialect.test_query()))
            .await
            .map(|_| ())
    }
}

impl<D: Introspect, M: ConnectionManager> Driver<D, M> {
    /// Lists the columns of every user table.
    ///
    /// # Errors
    ///
    /// Query errors, or [`DriverError::Decode`](crate::DriverError::Decode)
    /// for rows missing a catalog column.
    pub async fn columns(&self) -> Result<Vec<ColumnInfo>> {
        let rows = self.query(&Query::new(self.dialect.columns_query())).await?;
        let columns = rows
            .iter()
            .map(ColumnInfo::from_row)
            .collect::<std::result::Result<Vec<_>, DecodeError>>()?;
        Ok(columns)
    }

    /// Lists primary-key columns, optionally scoped by an SQL condition.
    ///
    /// # Errors
    ///
    /// As for [`Driver::columns`].
    pub async fn primary_keys(&self, condition: Option<&str>) -> Result<Vec<PrimaryKeyInfo>> {
        let sql = self.dialect.primary_keys_query(condition);
        let rows = self.query(&Query::new(sql)).await?;
        let keys = rows
            .iter()
            .map(PrimaryKeyInfo::from_row)
            .collect::<std::result::Result<Vec<_>, DecodeError>>()?;
        Ok(keys)
    }

    /// Lists foreign-key columns, optionally scoped by an SQL condition.
    ///
    /// # Errors
    ///
    /// As for [`Driver::columns`].
    pub async fn foreign_keys(&self, condition: Option<&str>) -> Result<Vec<ForeignKeyInfo>> {
        let sql = self.dialect.foreign_keys_query(condition);
        let rows = self.query(&Query::new(sql)).await?;
        let keys = rows
            .iter()
            .map(ForeignKeyInfo::from_row)
            .collect::<std::result::Result<Vec<_>, DecodeError>>()?;
        Ok(keys)
    }

    /// Runs all three catalog queries. A catalog without user objects
    /// yields an empty snapshot, not an error.
    ///
    /// # Errors
    ///
    /// The first error of the three catalog queries.
    pub async fn introspect(&self, condition: Option<&str>) -> Result<SchemaSnapshot> {
        let snapshot = SchemaSnapshot {
            columns: self.columns().await?,
            primary_keys: self.primary_keys(condition).await?,
            foreign_keys: self.foreign_keys(condition).await?,
        };
        debug!(
            columns = snapshot.columns.len(),
            primary_keys = snapshot.primary_keys.len(),
            foreign_keys = snapshot.foreign_keys.len(),
            "Introspected schema"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriverError;
    use crate::mock::MockManager;

    struct Catalog;

    impl Dialect for Catalog {
        fn name(&self) -> &'static str {
            "catalog"
        }

        fn test_query(&self) -> &'static str {
            "SELECT 1 FROM catalog"
        }
    }

    impl Introspect for Catalog {
        fn columns_query(&self) -> String {
            "SELECT columns".into()
        }

        fn primary_keys_query(&self, condition: Option<&str>) -> String {
            oxide_sql_core::introspect::with_condition("SELECT pks WHERE 1 = 1", condition)
        }

        fn foreign_keys_query(&self, condition: Option<&str>) -> String {
            oxide_sql_core::introspect::with_condition("SELECT fks WHERE 1 = 1", condition)
        }
    }

    fn driver(manager: &MockManager) -> Driver<Catalog, MockManager> {
        Driver::new(Catalog, manager.clone(), PoolConfig::new().with_max_size(2))
    }

    #[tokio::test]
    async fn test_connection_runs_test_query() {
        let manager = MockManager::new();
        let driver = driver(&manager);

        driver.test_connection().await.unwrap();
        assert_eq!(manager.executed(), ["SELECT 1 FROM catalog"]);
        assert_eq!(driver.pool().status().available, 2);
    }

    #[tokio::test]
    async fn test_connection_surfaces_failure() {
        let manager = MockManager::new();
        manager.fail("SELECT 1 FROM catalog", None, "database is shut down");
        let driver = driver(&manager);

        let err = driver.test_connection().await.unwrap_err();
        assert!(matches!(err, DriverError::Query { code: None, .. }));
        assert_eq!(driver.pool().status().available, 2);
    }

    #[tokio::test]
    async fn test_introspect_empty_catalog() {
        let manager = MockManager::new();
        manager
            .respond("SELECT columns", vec![])
            .respond("SELECT pks WHERE 1 = 1", vec![])
            .respond("SELECT fks WHERE 1 = 1", vec![]);
        let driver = driver(&manager);

        let snapshot = driver.introspect(None).await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_introspect_passes_condition_and_decodes() {
        let manager = MockManager::new();
        manager
            .respond(
                "SELECT columns",
                vec![Row::new()
                    .with("table_schema", "SYSDBA")
                    .with("table_name", "COUNTRY   ")
                    .with("column_name", "CURRENCY")
                    .with("data_type", "VARYING")],
            )
            .respond(
                "SELECT pks WHERE 1 = 1 AND (table_name = 'COUNTRY')",
                vec![Row::new()
                    .with("table_schema", "SYSDBA")
                    .with("table_name", "COUNTRY")
                    .with("column_name", "COUNTRY ")],
            )
            .respond(
                "SELECT fks WHERE 1 = 1 AND (table_name = 'COUNTRY')",
                vec![],
            );
        let driver = driver(&manager);

        let snapshot = driver
            .introspect(Some("table_name = 'COUNTRY'"))
            .await
            .unwrap();
        assert_eq!(snapshot.table_names(), ["COUNTRY"]);
        assert_eq!(snapshot.primary_key_of("COUNTRY"), ["COUNTRY"]);
        assert!(snapshot.foreign_keys.is_empty());
    }

    #[tokio::test]
    async fn test_introspect_reports_malformed_rows() {
        let manager = MockManager::new();
        manager.respond("SELECT columns", vec![Row::new().with("table_name", "T")]);
        let driver = driver(&manager);

        let err = driver.columns().await.unwrap_err();
        assert!(matches!(
            err,
            DriverError::Decode(DecodeError::MissingColumn(ref column)) if column == "table_schema"
        ));
    }

    #[tokio::test]
    async fn test_release_closes_pool() {
        let manager = MockManager::new();
        let driver = driver(&manager);
        driver.query(&Query::new("SELECT 1")).await.unwrap();

        driver.release().await;
        assert!(driver.pool().is_closed());
        assert_eq!(manager.closed(), 1);
        assert!(matches!(
            driver.query(&Query::new("SELECT 1")).await,
            Err(DriverError::PoolClosed)
        ));
    }
}
