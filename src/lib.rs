pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod store;
pub mod submission;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::rate_limit::{LoginRateLimiter, LOGIN_WINDOW};
use crate::state::{AppState, SharedState};
use crate::store::SubmissionStore;

pub fn build_app(config: Config, store: Arc<dyn SubmissionStore>) -> Router {
    let max_body_size = config.max_body_size;

    let login_limiter = Arc::new(LoginRateLimiter::new());
    if tokio::runtime::Handle::try_current().is_ok() {
        rate_limit::spawn_sweeper(Arc::downgrade(&login_limiter), LOGIN_WINDOW);
    }

    let state: SharedState = Arc::new(AppState {
        config,
        store,
        login_limiter,
    });

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
