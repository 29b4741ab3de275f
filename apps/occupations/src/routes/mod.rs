pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::occupations::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/occupations", get(handlers::handle_list_occupations))
        .route(
            "/api/v1/occupations/fetch",
            post(handlers::handle_fetch_occupations),
        )
        .route(
            "/api/v1/occupations/:code",
            get(handlers::handle_get_occupation),
        )
        .with_state(state)
}
