//! Async connection pool for Diesel PostgreSQL connections.
//!
//! Wraps `diesel-async`'s `bb8` integration. Every repository call checks a
//! connection out for the duration of one statement; dropping the guard
//! returns it to the pool.

use std::time::Duration;

use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection};

use super::rds_iam::RdsIamAuth;

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// No connection could be checked out within the timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },

    /// The pool could not be built.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// A checked-out connection failed a liveness query.
    #[error("database ping failed: {message}")]
    Ping { message: String },
}

impl PoolError {
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn ping(message: impl Into<String>) -> Self {
        Self::Ping {
            message: message.into(),
        }
    }

    /// Underlying message without the variant prefix.
    pub fn into_message(self) -> String {
        match self {
            Self::Checkout { message } | Self::Build { message } | Self::Ping { message } => {
                message
            }
        }
    }
}

/// Pool sizing and timeouts.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use symptom_tracker::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://tracker@localhost/symptoms")
///     .with_max_size(4)
///     .with_connection_timeout(Duration::from_secs(5));
/// assert_eq!(config.max_size(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
    iam_auth: Option<RdsIamAuth>,
}

impl PoolConfig {
    /// Defaults: 10 connections, 1 kept idle, 30 second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            min_idle: Some(1),
            connection_timeout: Duration::from_secs(30),
            iam_auth: None,
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Authenticate every new connection with an RDS IAM token over TLS.
    pub fn with_iam_auth(mut self, auth: RdsIamAuth) -> Self {
        self.iam_auth = Some(auth);
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }
}

/// Shared handle to the PostgreSQL pool. Cloning is cheap.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
}

impl DbPool {
    /// Build the pool. Connections are opened lazily except for `min_idle`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Build`] when the manager rejects the URL or the
    /// initial idle connections cannot be opened.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let manager = match config.iam_auth {
            Some(auth) => {
                let mut manager_config = ManagerConfig::default();
                manager_config.custom_setup = Box::new(move |url| auth.connect(url));
                AsyncDieselConnectionManager::<AsyncPgConnection>::new_with_config(
                    config.database_url,
                    manager_config,
                )
            }
            None => AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url),
        };

        let pool = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        Ok(Self { inner: pool })
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Checkout`] when the checkout times out or a new
    /// connection cannot be established.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }

    /// Run `SELECT 1` on a pooled connection.
    pub async fn ping(&self) -> Result<(), PoolError> {
        let mut conn = self.get().await?;
        conn.batch_execute("SELECT 1")
            .await
            .map_err(|err| PoolError::ping(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_favour_a_small_service() {
        let config = PoolConfig::new("postgres://localhost/symptoms");

        assert_eq!(config.database_url(), "postgres://localhost/symptoms");
        assert_eq!(config.max_size(), 10);
        assert_eq!(config.min_idle, Some(1));
        assert_eq!(config.connection_timeout, Duration::from_secs(30));
        assert!(config.iam_auth.is_none());
    }

    #[rstest]
    fn builder_overrides_each_field() {
        let config = PoolConfig::new("postgres://localhost/symptoms")
            .with_max_size(3)
            .with_min_idle(None)
            .with_connection_timeout(Duration::from_secs(2));

        assert_eq!(config.max_size(), 3);
        assert_eq!(config.min_idle, None);
        assert_eq!(config.connection_timeout, Duration::from_secs(2));
    }

    #[rstest]
    #[case(PoolError::checkout("timed out"), "timed out")]
    #[case(PoolError::build("bad url"), "bad url")]
    #[case(PoolError::ping("reset"), "reset")]
    fn into_message_strips_the_prefix(#[case] error: PoolError, #[case] expected: &str) {
        assert!(error.to_string().contains(expected));
        assert_eq!(error.into_message(), expected);
    }
}
