use axum::{Router, routing::get};

pub mod system;
pub mod users;

/// Router for every endpoint. Authentication is applied by the pipeline, not here.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .nest("/users", users::router())
        .fallback(system::not_found)
}
