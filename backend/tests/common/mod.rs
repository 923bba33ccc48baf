//! Common test utilities for integration tests
//!
//! The app runs over in-memory storage with a fixed planner seed, so no
//! database is needed.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use fouxd_training_backend::{
    config::AppConfig, identity::OWNER_HEADER, repositories::MemoryStorage, routes,
    state::AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub storage: Arc<MemoryStorage>,
    owner: Option<String>,
}

impl TestApp {
    /// App whose workout ticks once per second
    pub fn new() -> Self {
        Self::with_tick(Duration::from_secs(1))
    }

    /// App whose workout sessions never tick on their own during a test
    pub fn frozen() -> Self {
        Self::with_tick(Duration::from_secs(24 * 3600))
    }

    pub fn with_tick(tick: Duration) -> Self {
        let mut config = AppConfig::default();
        config.workout.tick_interval_ms = tick.as_millis() as u64;
        config.workout.finished_retention_secs = 3600;
        config.planner.seed = Some(42);

        let storage = Arc::new(MemoryStorage::new());
        let state = AppState::new(storage.clone(), config);

        Self {
            app: routes::create_router(state),
            storage,
            owner: None,
        }
    }

    /// Same app, sending requests as `owner`
    pub fn as_owner(&self, owner: &str) -> Self {
        Self {
            app: self.app.clone(),
            storage: self.storage.clone(),
            owner: Some(owner.to_string()),
        }
    }

    /// Send a request and return status, headers and body
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, String) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(owner) = &self.owner {
            builder = builder.header(OWNER_HEADER, owner);
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body_str = String::from_utf8(body.to_vec()).unwrap();

        (status, headers, body_str)
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let (status, _, body) = self.send(method, path, body).await;
        (status, body)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, String) {
        self.request(Method::GET, path, None).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: Value) -> (StatusCode, String) {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> (StatusCode, String) {
        self.request(Method::POST, path, None).await
    }

    pub async fn put(&self, path: &str, body: Value) -> (StatusCode, String) {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> (StatusCode, String) {
        self.request(Method::DELETE, path, None).await
    }

    pub async fn delete_with(&self, path: &str, body: Value) -> (StatusCode, String) {
        self.request(Method::DELETE, path, Some(body)).await
    }
}

pub fn parse(body: &str) -> Value {
    serde_json::from_str(body).unwrap()
}

/// Profile JSON with free time only on the given days
pub fn profile_json(weight: f64, free: &[(&str, f64)]) -> Value {
    let days = [
        "monday",
        "tuesday",
        "wednesday",
        "thursday",
        "friday",
        "saturday",
        "sunday",
    ];
    let availability: Vec<Value> = days
        .iter()
        .map(|day| {
            let hours = free
                .iter()
                .find(|(d, _)| d == day)
                .map(|(_, h)| *h)
                .unwrap_or(0.0);
            json!({ "week_day": day, "free_time": hours })
        })
        .collect();

    json!({
        "weight": weight,
        "height": 175.0,
        "age": 30,
        "gender": "female",
        "availability": availability,
        "activity_level": "moderate",
    })
}
