#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::{DateTime, Utc};
use linkforge::application::services::{ResolutionService, ServiceSettings};
use linkforge::domain::repositories::{IndexCommit, KeyValueStore};
use linkforge::error::AppError;
use linkforge::infrastructure::store::MemoryStore;
use linkforge::routes::api_router;
use linkforge::state::AppState;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub const BASE_URL: &str = "http://s.test/short-url/";

pub fn create_test_state(store: Arc<dyn KeyValueStore>) -> AppState {
    let service = Arc::new(ResolutionService::new(store, ServiceSettings::default()).unwrap());
    AppState::new(service, BASE_URL, 3, CancellationToken::new())
}

/// Test server over a fresh in-memory store, which is returned for setup and
/// assertions.
pub fn create_test_server() -> (TestServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = create_test_state(store.clone());
    (server_for(state), store)
}

pub fn server_for(state: AppState) -> TestServer {
    TestServer::new(api_router(state, &[])).unwrap()
}

/// Shortens `url` through the API and returns the code.
pub async fn shorten(server: &TestServer, url: &str) -> String {
    let response = server
        .post("/shorten-url")
        .json(&serde_json::json!({ "destination": url }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<serde_json::Value>()["code"]
        .as_str()
        .unwrap()
        .to_string()
}

/// A store whose every call fails as if Redis were unreachable.
pub struct UnreachableStore;

fn down(operation: &'static str) -> AppError {
    AppError::store_unavailable(operation, "Connection refused (os error 111)")
}

#[async_trait]
impl KeyValueStore for UnreachableStore {
    async fn exists(&self, _key: &str) -> Result<bool, AppError> {
        Err(down("EXISTS"))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(down("GET"))
    }

    async fn hget(&self, _key: &str, _field: &str) -> Result<Option<String>, AppError> {
        Err(down("HGET"))
    }

    async fn claim_link(
        &self,
        _key: &str,
        _field: &str,
        _value: &str,
        _expires_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        Err(down("CLAIM"))
    }

    async fn commit_index(&self, _commit: IndexCommit) -> Result<(), AppError> {
        Err(down("COMMIT_INDEX"))
    }

    async fn zadd_nx(&self, _set: &str, _member: &str, _score: f64) -> Result<bool, AppError> {
        Err(down("ZADD"))
    }

    async fn zincrby(&self, _set: &str, _member: &str, _delta: f64) -> Result<f64, AppError> {
        Err(down("ZINCRBY"))
    }

    async fn zscore(&self, _set: &str, _member: &str) -> Result<Option<f64>, AppError> {
        Err(down("ZSCORE"))
    }

    async fn zrevrange_by_score(
        &self,
        _set: &str,
        _min: f64,
        _max: f64,
        _offset: usize,
        _count: usize,
    ) -> Result<Vec<(String, f64)>, AppError> {
        Err(down("ZREVRANGEBYSCORE"))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(down("PING"))
    }
}
