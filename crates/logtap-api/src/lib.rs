//! HTTP query service over the logtap core.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{get_logs, get_parsed_logs, health_check, list_files};
use crate::middleware::require_api_key;
use crate::state::AppState;

pub use config::{ConfigError, Settings};
pub use error::ApiError;

pub fn create_app(state: Arc<AppState>) -> Router {
    // routes - protected routes with API key
    let protected_routes = Router::new()
        .route("/logs", get(get_logs))
        .route("/logs/parsed", get(get_parsed_logs))
        .route("/files", get(list_files))
        .layer(from_fn_with_state(state.clone(), require_api_key));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Health endpoint without auth
    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
