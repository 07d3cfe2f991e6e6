//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext wiring the router to a fixture question bank
//! - A manual clock so card transitions complete on demand

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use revise_backend::{router, AppState};
use revise_core::{EngineSettings, ManualClock, QuestionBank};

/// Test context holding the router and the clock it runs on.
pub struct TestContext {
    pub clock: Arc<ManualClock>,
    app: Router,
}

impl TestContext {
    /// Create a test context over the fixture bank with default settings.
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    /// Create a test context with custom engine settings.
    pub fn with_settings(settings: EngineSettings) -> Self {
        let bank = QuestionBank::from_json(fixtures::SAMPLE_BANK).expect("fixture bank parses");
        let clock = Arc::new(ManualClock::new(0));
        let state = AppState::new(bank, settings, clock.clone());

        Self {
            clock,
            app: router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Start a test server over the router.
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).expect("test server starts")
    }
}

/// Create a session and return its ID.
pub async fn create_session(server: &TestServer, subjects: Option<&[&str]>) -> String {
    let response = server
        .post("/api/sessions")
        .json(&fixtures::create_session_request(subjects))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    body["id"].as_str().expect("session id").to_string()
}
