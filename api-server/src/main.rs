//! Premium Estimator API Server
//!
//! Serves premium estimates from a bundle trained at startup, behind a
//! username/password gate.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  PREMIUM SERVER (Axum)               │
//! ├──────────────────────────────────────────────────────┤
//! │  /health  /auth/*  ──►  CredentialStore (users.csv)  │
//! │  /predict /model   ──►  JWT middleware               │
//! │                           │                          │
//! │                           ▼                          │
//! │                  ArtifactHandle (Arc swap)           │
//! │                  schema → preprocessor → model       │
//! └──────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod extract;
mod handlers;
mod middleware;
mod models;
mod pipeline;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use premium_core::ArtifactHandle;

pub use error::{AppError, AppResult};

use store::CredentialStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging; core `log` records are bridged into tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "premium_server=debug,premium_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("Premium Estimator server starting ({})...", config.environment);
    if config.is_production() && std::env::var("JWT_SECRET").is_err() {
        tracing::warn!("JWT_SECRET not set; using the development secret");
    }

    let credentials = CredentialStore::open(&config.credentials_path)
        .with_context(|| format!("cannot open credential store {}", config.credentials_path.display()))?;

    // Schema, fit and training failures abort startup before the listener binds
    let training_config = config.clone();
    let bundle = tokio::task::spawn_blocking(move || pipeline::load_or_train(&training_config))
        .await?
        .context("cannot build the artifact bundle")?;

    tracing::info!(
        "Serving bundle {} ({} features)",
        bundle.metadata.id,
        bundle.schema.len()
    );

    let state = AppState {
        config: config.clone(),
        credentials: Arc::new(credentials),
        artifacts: Arc::new(ArtifactHandle::new(bundle)),
        retrain_lock: Arc::new(Mutex::new(())),
    };

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub credentials: Arc<CredentialStore>,
    pub artifacts: Arc<ArtifactHandle>,
    /// Serializes retrains
    pub retrain_lock: Arc<Mutex<()>>,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/auth/register", post(handlers::auth::register))
        .route("/api/v1/auth/login", post(handlers::auth::login));

    // Estimation routes (user JWT auth)
    let protected_routes = Router::new()
        .route("/api/v1/predict", post(handlers::predict::estimate))
        .route("/api/v1/model", get(handlers::model::info))
        .route("/api/v1/model/retrain", post(handlers::model::retrain))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_user_auth
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
