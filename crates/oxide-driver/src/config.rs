//! Pool configuration.

use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Default number of pooled connections.
pub const DEFAULT_MAX_SIZE: usize = 8;

/// Default time a caller waits for a free connection.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection pool configuration.
///
/// Deserializes from e.g. `{"max_size": 4, "acquire_timeout_ms": 500}`;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Maximum number of live connections.
    pub max_size: usize,
    /// Maximum time to wait for a connection.
    #[serde(rename = "acquire_timeout_ms", deserialize_with = "duration_from_millis")]
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolConfig {
    /// Creates a configuration with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum pool size
    #[must_use]
    pub const fn with_max_size(mut self, size: usize) -> Self {
        self.max_size = size;
        self
    }

    /// Set acquire timeout
    #[must_use]
    pub const fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Pool size actually used; a pool always has at least one slot.
    #[must_use]
    pub fn effective_max_size(&self) -> usize {
        self.max_size.max(1)
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}
