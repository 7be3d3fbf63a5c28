pub mod cap_tables;
pub mod health;

use crate::config::Config;
use crate::error::AppError;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("No such route".to_string())
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/cap-tables", post(cap_tables::post_cap_tables))
        .fallback(not_found)
        .layer(cors)
        .with_state(state)
}
