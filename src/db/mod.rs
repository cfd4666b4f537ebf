//! Database access used by the health probe.
//!
//! The probe only talks to the database through the traits defined here:
//! a [`SessionSource`] hands out one [`DatabaseSession`] per probe, and a pool
//! may additionally expose its occupancy through [`PoolIntrospection`].
//! [`PgDatabase`] implements all three on top of an `sqlx` Postgres pool.

mod postgres;

pub use postgres::PgDatabase;

use async_trait::async_trait;

/// Error raised by a database session or the pool behind it.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{0}")]
    Unexpected(String),
}

/// A connection checked out for the duration of one probe.
///
/// Dropping the session returns the connection to its pool.
#[async_trait]
pub trait DatabaseSession: Send {
    /// Trivial round-trip (`SELECT 1`).
    async fn ping(&mut self) -> Result<(), DbError>;

    /// Server version string (`SELECT version()`).
    async fn server_version(&mut self) -> Result<String, DbError>;

    /// Number of tables visible in the `public` schema.
    async fn public_table_count(&mut self) -> Result<u64, DbError>;
}

/// Hands out database sessions, typically from a connection pool.
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, DbError>;
}

/// Point-in-time occupancy of a connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolCounters {
    /// Open connections, idle or in use
    pub size: u32,
    /// Idle connections ready to be handed out
    pub checked_in: u32,
    /// Connections currently lent to callers
    pub checked_out: u32,
}

/// Pools that can report their occupancy.
pub trait PoolIntrospection: Send + Sync {
    fn counters(&self) -> PoolCounters;
}
