use crate::services::support::{support_services, SupportServices};
use crate::state::SharedState;
use axum::{routing::get, Json, Router};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/services", get(get_services))
        .with_state(state)
}

async fn get_services() -> Json<SupportServices> {
    tracing::debug!("Support services requested");
    Json(support_services())
}
