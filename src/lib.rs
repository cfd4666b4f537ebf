//! Legal Lingo API
//!
//! Backend scaffold exposing a database-aware health endpoint. The health
//! probe checks PostgreSQL reachability, reads the server version and table
//! count, and reports connection-pool occupancy, degrading gracefully when the
//! database is unreachable.

pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod http;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod state;

pub use error::AppError;
