pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/recommendations",
            get(handlers::handle_get_recommendations).delete(handlers::handle_evict_user),
        )
        .route(
            "/api/v1/recommendations/profile",
            put(handlers::handle_update_profile),
        )
        .route(
            "/api/v1/recommendations/refresh",
            post(handlers::handle_trigger_refresh),
        )
        .route(
            "/api/v1/recommendations/:job_id",
            delete(handlers::handle_remove_recommendation),
        )
        .route(
            "/api/v1/recommendations/:job_id/reasons",
            get(handlers::handle_get_reasons),
        )
        .with_state(state)
}
