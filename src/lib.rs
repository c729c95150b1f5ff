use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

use handlers::{health, metrics, users, AppState};

pub fn create_app(state: AppState) -> Router {
    let user_routes = Router::new()
        .route("/fetch", post(users::fetch))
        .route("/getUserInfoById", get(users::get_user_info_by_id))
        .route("/update", post(users::update))
        .route("/export", post(users::export))
        .route("/generate", post(users::generate));

    Router::new()
        .nest("/api/v1/admin/user", user_routes)
        .route("/health", get(health::liveness))
        .route("/ready", get(health::readiness))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(from_fn_with_state(state.clone(), middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
