//! Database-aware health checking.

mod probe;
mod report;

pub use probe::{HealthProbe, ProbeOutcome};
pub use report::{DatabaseHealth, HealthReport, PoolCount, PoolStats, TableAccess, UNKNOWN};
