pub mod assessment;
pub mod auth;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Admin auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        // Assessment requests
        .route(
            "/api/assessment",
            get(assessment::list).post(assessment::submit),
        )
}
