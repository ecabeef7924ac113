//! Firebird driver configuration.

use std::fmt;
use std::time::Duration;

use oxide_driver::{
    ConnectionManager, Driver, PoolConfig, DEFAULT_ACQUIRE_TIMEOUT, DEFAULT_MAX_SIZE,
};
use serde::Deserialize;
use tracing::info;

use crate::connection::FirebirdManager;
use crate::dialect::FirebirdDialect;

/// Default Firebird server port.
pub const DEFAULT_PORT: u16 = 3050;

/// A driver speaking the Firebird dialect, by default over
/// [`FirebirdManager`] sessions.
pub type FirebirdDriver<M = FirebirdManager> = Driver<FirebirdDialect, M>;

/// Connection settings of a Firebird database.
///
/// Deserializes from the option names used by Firebird client libraries,
/// e.g. `{"host": "db", "database": "/data/employee.fdb", "maxPoolSize": 4}`.
/// The connection fields are read by [`FirebirdManager`] when it opens
/// sessions; the pool fields size the driver's pool. `Debug` output masks
/// the password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FirebirdConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Maximum number of pooled connections.
    pub max_pool_size: usize,
    /// Time to wait for a free connection, in milliseconds.
    pub acquire_timeout_ms: u64,
}

impl fmt::Debug for FirebirdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebirdConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("max_pool_size", &self.max_pool_size)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .finish()
    }
}

impl Default for FirebirdConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: DEFAULT_PORT,
            database: String::new(),
            user: String::from("SYSDBA"),
            password: String::new(),
            max_pool_size: DEFAULT_MAX_SIZE,
            acquire_timeout_ms: u64::try_from(DEFAULT_ACQUIRE_TIMEOUT.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl FirebirdConfig {
    /// Creates a configuration for `database` on the default server.
    #[must_use]
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    /// Set server host and port
    #[must_use]
    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set login credentials
    #[must_use]
    pub fn with_credentials(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.user = user.into();
        self.password = password.into();
        self
    }

    /// Set maximum pool size
    #[must_use]
    pub const fn with_max_pool_size(mut self, size: usize) -> Self {
        self.max_pool_size = size;
        self
    }

    /// Set acquire timeout
    #[must_use]
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// The `host/port:database` connection string.
    #[must_use]
    pub fn connection_string(&self) -> String {
        format!("{}/{}:{}", self.host, self.port, self.database)
    }

    /// Pool settings derived from this configuration.
    #[must_use]
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .with_max_size(self.max_pool_size)
            .with_acquire_timeout(Duration::from_millis(self.acquire_timeout_ms))
    }

    /// Builds a driver whose sessions are opened by `manager`.
    #[must_use]
    pub fn build_driver<M: ConnectionManager>(&self, manager: M) -> FirebirdDriver<M> {
        let pool = self.pool_config();
        info!(
            database = %self.connection_string(),
            max_pool_size = pool.effective_max_size(),
            "Creating Firebird driver"
        );
        Driver::new(FirebirdDialect::new(), manager, pool)
    }

    /// Builds a driver connecting to the configured server with
    /// [`FirebirdManager`]. No session is opened until the first query.
    #[must_use]
    pub fn into_driver(self) -> FirebirdDriver {
        let manager = FirebirdManager::new(self.clone());
        self.build_driver(manager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FirebirdConfig::default();
        assert_eq!(config.port, 3050);
        assert_eq!(config.max_pool_size, 8);
        assert_eq!(config.pool_config(), PoolConfig::default());
    }

    #[test]
    fn test_builders() {
        let config = FirebirdConfig::new("/data/employee.fdb")
            .with_server("db.internal", 3051)
            .with_credentials("REPORTS", "secret")
            .with_max_pool_size(2)
            .with_acquire_timeout(Duration::from_millis(250));
        assert_eq!(config.connection_string(), "db.internal/3051:/data/employee.fdb");
        assert_eq!(config.user, "REPORTS");
        assert_eq!(
            config.pool_config(),
            PoolConfig::new()
                .with_max_size(2)
                .with_acquire_timeout(Duration::from_millis(250))
        );
    }

    #[test]
    fn test_deserialize_client_options() {
        let config: FirebirdConfig = serde_json::from_str(
            r#"{"host": "fb", "database": "employee", "maxPoolSize": 3, "acquireTimeoutMs": 500}"#,
        )
        .unwrap();
        assert_eq!(config.host, "fb");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_pool_size, 3);
        assert_eq!(config.pool_config().acquire_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_debug_masks_password() {
        let config = FirebirdConfig::new("employee").with_credentials("SYSDBA", "masterkey");
        let debug = format!("{config:?}");
        assert!(debug.contains("SYSDBA"));
        assert!(!debug.contains("masterkey"));
    }

    #[test]
    fn test_into_driver_uses_config() {
        let config = FirebirdConfig::new("/data/employee.fdb")
            .with_server("db.internal", 3051)
            .with_max_pool_size(3);
        let driver = config.clone().into_driver();
        assert_eq!(driver.pool().manager().config(), &config);
        assert_eq!(driver.pool().status().max_size, 3);
        assert_eq!(driver.pool().status().size, 0);
    }

    #[test]
    fn test_zero_pool_size_is_clamped() {
        let config = FirebirdConfig::default().with_max_pool_size(0);
        assert_eq!(config.pool_config().effective_max_size(), 1);
    }
}
