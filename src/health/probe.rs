//! Database health probe.
//!
//! One call to [`HealthProbe::run`] checks out a session, runs up to three
//! read-only queries, snapshots the pool, and assembles a [`HealthReport`].
//! Failures never escape: the acquire, `SELECT 1` and `SELECT version()` steps
//! decide between healthy and unhealthy, while a failing table count only marks
//! the tables as inaccessible.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};

use super::report::{DatabaseHealth, HealthReport, PoolStats, TableAccess};
use crate::config::AppSettings;
use crate::db::{DbError, PoolIntrospection, SessionSource};

/// Result of one probe.
#[derive(Debug, Clone)]
pub enum ProbeOutcome {
    /// The database answered the basic queries. Table access may still be degraded.
    Healthy(HealthReport),
    /// The database could not be reached or failed a basic query.
    Unhealthy(HealthReport),
}

impl ProbeOutcome {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ProbeOutcome::Healthy(_))
    }

    /// Connected, but the table count could not be read.
    pub fn is_degraded(&self) -> bool {
        match self {
            ProbeOutcome::Healthy(report) => !report.database.tables_accessible(),
            ProbeOutcome::Unhealthy(_) => false,
        }
    }

    pub fn report(&self) -> &HealthReport {
        match self {
            ProbeOutcome::Healthy(report) | ProbeOutcome::Unhealthy(report) => report,
        }
    }

    pub fn into_report(self) -> HealthReport {
        match self {
            ProbeOutcome::Healthy(report) | ProbeOutcome::Unhealthy(report) => report,
        }
    }
}

/// Checks database reachability and reports it with the application metadata.
///
/// Holds no mutable state; concurrent runs are independent and each one uses
/// its own session.
pub struct HealthProbe {
    sessions: Arc<dyn SessionSource>,
    pool: Option<Arc<dyn PoolIntrospection>>,
    app_name: String,
    app_version: String,
}

impl HealthProbe {
    /// Create a probe. Pass `pool = None` when the session source cannot report
    /// its occupancy; reports then carry `"unknown"` pool counters.
    pub fn new(
        app: &AppSettings,
        sessions: Arc<dyn SessionSource>,
        pool: Option<Arc<dyn PoolIntrospection>>,
    ) -> Self {
        Self {
            sessions,
            pool,
            app_name: app.name.clone(),
            app_version: app.version.clone(),
        }
    }

    pub async fn run(&self) -> ProbeOutcome {
        match self.check_database().await {
            Ok(database) => {
                tracing::debug!(
                    version = database.version().unwrap_or_default(),
                    tables_accessible = database.tables_accessible(),
                    table_count = database.table_count(),
                    "Database health check passed"
                );
                ProbeOutcome::Healthy(self.report(database))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ProbeOutcome::Unhealthy(self.report(DatabaseHealth::disconnected(e.to_string())))
            }
        }
    }

    async fn check_database(&self) -> Result<DatabaseHealth, DbError> {
        let mut session = self.sessions.acquire().await?;
        session.ping().await?;
        let version = session.server_version().await?;

        let tables = match session.public_table_count().await {
            Ok(count) => TableAccess::Accessible(count),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Table count query failed, reporting tables as inaccessible"
                );
                TableAccess::Inaccessible
            }
        };

        // Snapshot while our own session is still checked out
        let pool = PoolStats::from(self.pool.as_ref().map(|p| p.counters()));

        Ok(DatabaseHealth::connected(version, tables, pool))
    }

    fn report(&self, database: DatabaseHealth) -> HealthReport {
        HealthReport {
            app_name: self.app_name.clone(),
            app_version: self.app_version.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            database,
        }
    }
}
