//! PostgreSQL pool backed by `sqlx`.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use sqlx::{ConnectOptions, Connection, Postgres};

use super::{DatabaseSession, DbError, PoolCounters, PoolIntrospection, SessionSource};
use crate::config::DatabaseConfig;

const TABLE_COUNT_SQL: &str =
    "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = 'public'";

/// Shared handle to the application's Postgres pool.
///
/// Cloning is cheap; all clones refer to the same pool.
#[derive(Clone)]
pub struct PgDatabase {
    pool: PgPool,
    options: PgConnectOptions,
    connect_timeout: Duration,
}

impl PgDatabase {
    /// Build the pool without opening any connection yet.
    ///
    /// Connections are established on first use, so an unreachable server
    /// surfaces through [`PgDatabase::check_connection`] or the health probe
    /// rather than here.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let mut options = PgConnectOptions::new()
            .host(config.host.as_deref().unwrap_or_default())
            .port(config.port.unwrap_or(5432))
            .username(config.user.as_deref().unwrap_or_default())
            .password(config.password.as_deref().unwrap_or_default())
            .database(config.name.as_deref().unwrap_or_default());

        if !config.sql_echo {
            options = options.disable_statement_logging();
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections())
            .max_lifetime(Duration::from_secs(config.recycle_seconds))
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
            .test_before_acquire(true)
            .connect_lazy_with(options.clone());

        Self {
            pool,
            options,
            connect_timeout: Duration::from_secs(config.connect_timeout_seconds),
        }
    }

    /// Run `SELECT 1` on a pooled connection, returning the failure if any.
    pub async fn check_connection(&self) -> Result<(), DbError> {
        let mut session = self.acquire().await?;
        session.ping().await
    }

    /// Close every connection and reject further acquires.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// The pool keeps retrying a failing connect until its acquire timeout
    /// and then reports only `PoolTimedOut`. One direct attempt with the same
    /// options recovers the underlying cause (refused, bad password, ...).
    async fn connect_failure(&self) -> DbError {
        match tokio::time::timeout(self.connect_timeout, self.options.connect()).await {
            Ok(Err(e)) => e.into(),
            Ok(Ok(conn)) => {
                if let Err(e) = conn.close().await {
                    tracing::debug!(error = %e, "Failed to close diagnostic connection");
                }
                DbError::Unexpected(format!(
                    "timed out after {}s waiting for a pooled connection",
                    self.connect_timeout.as_secs()
                ))
            }
            Err(_) => DbError::Unexpected(format!(
                "timed out after {}s connecting to the database",
                self.connect_timeout.as_secs()
            )),
        }
    }
}

#[async_trait]
impl SessionSource for PgDatabase {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, DbError> {
        let conn = match tokio::time::timeout(self.connect_timeout, self.pool.acquire()).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(sqlx::Error::PoolTimedOut)) | Err(_) => return Err(self.connect_failure().await),
            Ok(Err(e)) => return Err(e.into()),
        };
        Ok(Box::new(PgSession { conn }))
    }
}

impl PoolIntrospection for PgDatabase {
    fn counters(&self) -> PoolCounters {
        let size = self.pool.size();
        let idle = u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX).min(size);
        PoolCounters {
            size,
            checked_in: idle,
            checked_out: size - idle,
        }
    }
}

struct PgSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl DatabaseSession for PgSession {
    async fn ping(&mut self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&mut *self.conn).await?;
        Ok(())
    }

    async fn server_version(&mut self) -> Result<String, DbError> {
        let version: Option<String> = sqlx::query_scalar("SELECT version()")
            .fetch_one(&mut *self.conn)
            .await?;
        version.ok_or_else(|| DbError::Unexpected("server returned no version".to_string()))
    }

    async fn public_table_count(&mut self) -> Result<u64, DbError> {
        let count: i64 = sqlx::query_scalar(TABLE_COUNT_SQL)
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use crate::config::AppSettings;
    use crate::health::HealthProbe;

    fn config() -> DatabaseConfig {
        DatabaseConfig {
            user: Some("lingo".to_string()),
            password: Some("secret".to_string()),
            host: Some("127.0.0.1".to_string()),
            port: Some(5432),
            name: Some("lingo".to_string()),
            pool_size: 3,
            max_overflow: 2,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_lazy_pool_starts_empty() {
        let db = PgDatabase::connect_lazy(&config());
        assert_eq!(
            db.counters(),
            PoolCounters {
                size: 0,
                checked_in: 0,
                checked_out: 0
            }
        );
    }

    #[tokio::test]
    async fn test_closed_pool_refuses_sessions() {
        let db = PgDatabase::connect_lazy(&config());
        db.close().await;
        assert!(db.acquire().await.is_err());
        assert!(db.check_connection().await.is_err());
    }

    /// Nothing listens on port 1, so every connect is refused.
    fn refused_config() -> DatabaseConfig {
        DatabaseConfig {
            port: Some(1),
            acquire_timeout_seconds: 5,
            connect_timeout_seconds: 1,
            ..config()
        }
    }

    #[tokio::test]
    async fn test_refused_connection_reports_cause_quickly() {
        let db = PgDatabase::connect_lazy(&refused_config());

        let start = Instant::now();
        let err = db.check_connection().await.unwrap_err().to_string();

        assert!(start.elapsed() < Duration::from_secs(4), "took {:?}", start.elapsed());
        assert!(!err.contains("pool timed out"), "{err}");
        assert!(err.to_lowercase().contains("refused"), "{err}");
    }

    #[tokio::test]
    async fn test_health_check_against_refused_server() {
        let db = Arc::new(PgDatabase::connect_lazy(&refused_config()));
        let checker = HealthProbe::new(
            &AppSettings::default(),
            db.clone(),
            Some(db as Arc<dyn PoolIntrospection>),
        );

        let start = Instant::now();
        let outcome = checker.run().await;

        assert!(start.elapsed() < Duration::from_secs(4));
        assert!(!outcome.is_healthy());
        let database = &outcome.report().database;
        assert!(!database.is_connected());
        let error = database.error().unwrap_or_default().to_lowercase();
        assert!(error.contains("refused"), "{error}");
    }
}
