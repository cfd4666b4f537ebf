//! Shared helpers for integration tests: an in-memory database and an app
//! router wired to it.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;

use legal_lingo_api::config::AppConfig;
use legal_lingo_api::db::{
    DatabaseSession, DbError, PoolCounters, PoolIntrospection, SessionSource,
};
use legal_lingo_api::health::HealthProbe;
use legal_lingo_api::routes::create_router;
use legal_lingo_api::state::AppState;

/// Behaviour of the fake database
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DbScenario {
    Healthy,
    Refused,
    NoSchemaPermission,
}

pub struct FakeDatabase {
    scenario: DbScenario,
}

impl FakeDatabase {
    pub fn new(scenario: DbScenario) -> Arc<Self> {
        Arc::new(Self { scenario })
    }
}

struct FakeSession {
    scenario: DbScenario,
}

#[async_trait]
impl DatabaseSession for FakeSession {
    async fn ping(&mut self) -> Result<(), DbError> {
        match self.scenario {
            DbScenario::Refused => Err(DbError::Unexpected(
                "connection refused (os error 111)".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn server_version(&mut self) -> Result<String, DbError> {
        Ok("PostgreSQL 15.2".to_string())
    }

    async fn public_table_count(&mut self) -> Result<u64, DbError> {
        match self.scenario {
            DbScenario::NoSchemaPermission => Err(DbError::Unexpected(
                "permission denied for schema public".to_string(),
            )),
            _ => Ok(12),
        }
    }
}

#[async_trait]
impl SessionSource for FakeDatabase {
    async fn acquire(&self) -> Result<Box<dyn DatabaseSession>, DbError> {
        Ok(Box::new(FakeSession {
            scenario: self.scenario,
        }))
    }
}

impl PoolIntrospection for FakeDatabase {
    fn counters(&self) -> PoolCounters {
        PoolCounters {
            size: 10,
            checked_in: 8,
            checked_out: 2,
        }
    }
}

/// Default configuration with database credentials filled in.
pub fn test_config() -> AppConfig {
    AppConfig::load_with(None, |key| {
        let value = match key {
            "POSTGRES_USER" => "lingo",
            "POSTGRES_PASSWORD" => "secret",
            "POSTGRES_HOST" => "localhost",
            "POSTGRES_PORT" => "5432",
            "POSTGRES_DB" => "lingo",
            _ => return None,
        };
        Some(value.to_string())
    })
    .expect("test config should be valid")
}

pub fn app_with(config: AppConfig, scenario: DbScenario, introspection: bool) -> Router {
    let db = FakeDatabase::new(scenario);
    let pool = introspection.then(|| db.clone() as Arc<dyn PoolIntrospection>);
    let probe = HealthProbe::new(&config.app, db, pool);
    create_router(AppState::new(config, probe))
}

pub fn app(scenario: DbScenario) -> Router {
    app_with(test_config(), scenario, true)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
