//! Shared helpers for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use dishrank_api::{create_api_router, ApiConfig, AppState};
use dishrank_test_utils::{InMemoryCatalogue, ManualClock, RankingConfig};
use serde_json::Value;
use tower::ServiceExt;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub catalogue: Arc<InMemoryCatalogue>,
    pub clock: Arc<ManualClock>,
}

pub fn test_app(catalogue: Arc<InMemoryCatalogue>, clock: Arc<ManualClock>) -> TestApp {
    test_app_with(catalogue, clock, RankingConfig::default(), ApiConfig::default())
}

pub fn test_app_with(
    catalogue: Arc<InMemoryCatalogue>,
    clock: Arc<ManualClock>,
    ranking_config: RankingConfig,
    api_config: ApiConfig,
) -> TestApp {
    let state = AppState::new(catalogue.clone(), ranking_config, clock.clone(), api_config);
    TestApp {
        router: create_api_router(state.clone()),
        state,
        catalogue,
        clock,
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// The `code` field of an error envelope.
    pub fn error_code(&self) -> Option<String> {
        self.json()
            .ok()
            .and_then(|v| v.get("code").and_then(Value::as_str).map(str::to_string))
    }
}

pub async fn send(
    app: &TestApp,
    method: Method,
    uri: &str,
) -> Result<TestResponse, Box<dyn std::error::Error>> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())?;
    let response = app.router.clone().oneshot(request).await?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(TestResponse {
        status,
        body: body.to_vec(),
    })
}

pub async fn get(app: &TestApp, uri: &str) -> Result<TestResponse, Box<dyn std::error::Error>> {
    send(app, Method::GET, uri).await
}
