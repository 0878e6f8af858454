pub mod analysis;
pub mod sessions;
pub mod support;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(analysis::router(state.clone()))
        .nest("/sessions", sessions::router(state.clone()))
        .nest("/support", support::router(state))
}
