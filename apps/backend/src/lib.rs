pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use revise_core::{Clock, EngineSettings, QuestionBank, SystemClock};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::services::sessions::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    pub settings: Arc<EngineSettings>,
    pub clock: Arc<dyn Clock>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(bank: QuestionBank, settings: EngineSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            bank: Arc::new(bank),
            settings: Arc::new(settings),
            clock,
            sessions: Arc::new(SessionStore::new()),
        }
    }

    /// Replace the session store with one that expires idle sessions after `ttl`.
    pub fn with_session_ttl(mut self, ttl: chrono::Duration) -> Self {
        self.sessions = Arc::new(SessionStore::with_ttl(ttl));
        self
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // Question bank routes
        .route("/api/subjects", get(routes::questions::subjects))
        .route("/api/deck", post(routes::questions::deck))
        .route("/api/evaluate", post(routes::questions::evaluate_answer))
        // Session routes
        .route("/api/sessions", post(routes::sessions::create))
        .route(
            "/api/sessions/:id",
            get(routes::sessions::get).delete(routes::sessions::delete),
        )
        .route(
            "/api/sessions/:id/subjects",
            put(routes::sessions::select_subjects),
        )
        .route("/api/sessions/:id/answers", post(routes::sessions::answer))
        .route("/api/sessions/:id/reveal", post(routes::sessions::reveal))
        .route("/api/sessions/:id/advance", post(routes::sessions::advance))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(path = %config.bank_path.display(), "Loading question bank...");
    let content = tokio::fs::read_to_string(&config.bank_path).await?;
    let bank = QuestionBank::from_json(&content)?;
    tracing::info!(
        questions = bank.len(),
        subjects = bank.subjects().len(),
        "Question bank loaded"
    );

    let state = AppState::new(bank, config.engine.clone(), Arc::new(SystemClock::new()))
        .with_session_ttl(config.session_ttl);
    let app = router(state);

    let addr = config.addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
