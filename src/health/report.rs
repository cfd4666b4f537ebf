//! Values produced by a health probe.
//!
//! Everything here is built once per probe, serialized into the response, and
//! dropped. Field names serialize in camelCase.

use std::borrow::Cow;

use serde::{Serialize, Serializer};
use utoipa::openapi::schema::{KnownFormat, ObjectBuilder, OneOfBuilder, SchemaFormat, Type};
use utoipa::openapi::{RefOr, Schema};
use utoipa::{PartialSchema, ToSchema};

use crate::db::PoolCounters;

/// Serialized in place of a pool counter the pool cannot report.
pub const UNKNOWN: &str = "unknown";

/// A pool counter, or `"unknown"` when the pool offers no introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolCount {
    Known(u32),
    Unknown,
}

impl Serialize for PoolCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PoolCount::Known(n) => serializer.serialize_u32(*n),
            PoolCount::Unknown => serializer.serialize_str(UNKNOWN),
        }
    }
}

impl PartialSchema for PoolCount {
    fn schema() -> RefOr<Schema> {
        let known = ObjectBuilder::new()
            .schema_type(Type::Integer)
            .format(Some(SchemaFormat::KnownFormat(KnownFormat::Int32)))
            .description(Some("Counter reported by the pool"))
            .build();
        let unknown = ObjectBuilder::new()
            .schema_type(Type::String)
            .enum_values(Some([UNKNOWN]))
            .description(Some("The pool does not expose this counter"))
            .build();

        RefOr::T(Schema::OneOf(
            OneOfBuilder::new()
                .item(Schema::Object(known))
                .item(Schema::Object(unknown))
                .build(),
        ))
    }
}

impl ToSchema for PoolCount {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("PoolCount")
    }
}

/// Pool occupancy snapshot. All three counters are known, or none are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    size: PoolCount,
    checked_in: PoolCount,
    checked_out: PoolCount,
}

impl PoolStats {
    pub fn unknown() -> Self {
        Self {
            size: PoolCount::Unknown,
            checked_in: PoolCount::Unknown,
            checked_out: PoolCount::Unknown,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.size == PoolCount::Unknown
    }

    pub fn size(&self) -> PoolCount {
        self.size
    }

    pub fn checked_in(&self) -> PoolCount {
        self.checked_in
    }

    pub fn checked_out(&self) -> PoolCount {
        self.checked_out
    }
}

impl From<PoolCounters> for PoolStats {
    fn from(counters: PoolCounters) -> Self {
        Self {
            size: PoolCount::Known(counters.size),
            checked_in: PoolCount::Known(counters.checked_in),
            checked_out: PoolCount::Known(counters.checked_out),
        }
    }
}

impl From<Option<PoolCounters>> for PoolStats {
    fn from(counters: Option<PoolCounters>) -> Self {
        counters.map_or_else(PoolStats::unknown, PoolStats::from)
    }
}

/// Outcome of the table-count query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAccess {
    Accessible(u64),
    Inaccessible,
}

/// Database section of the report.
///
/// Only constructible through [`DatabaseHealth::connected`] and
/// [`DatabaseHealth::disconnected`], so `error` is present exactly when
/// `connected` is false and `version` only when it is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    connected: bool,
    #[schema(example = "PostgreSQL 15.2 on x86_64-pc-linux-gnu")]
    version: Option<String>,
    tables_accessible: bool,
    table_count: u64,
    pool: PoolStats,
    error: Option<String>,
}

impl DatabaseHealth {
    pub fn connected(version: String, tables: TableAccess, pool: PoolStats) -> Self {
        let (tables_accessible, table_count) = match tables {
            TableAccess::Accessible(count) => (true, count),
            TableAccess::Inaccessible => (false, 0),
        };
        Self {
            connected: true,
            version: Some(version),
            tables_accessible,
            table_count,
            pool,
            error: None,
        }
    }

    pub fn disconnected(error: String) -> Self {
        Self {
            connected: false,
            version: None,
            tables_accessible: false,
            table_count: 0,
            pool: PoolStats::unknown(),
            error: Some(error),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn tables_accessible(&self) -> bool {
        self.tables_accessible
    }

    pub fn table_count(&self) -> u64 {
        self.table_count
    }

    pub fn pool(&self) -> &PoolStats {
        &self.pool
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Payload of the health endpoint.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    #[schema(example = "Legal Lingo API")]
    pub app_name: String,
    #[schema(example = "1.0.0")]
    pub app_version: String,
    /// RFC 3339 / ISO-8601 UTC timestamp taken when the report was assembled
    #[schema(example = "2024-05-01T12:00:00.000000Z")]
    pub timestamp: String,
    pub database: DatabaseHealth,
}
