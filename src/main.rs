mod config;
mod domain;
mod error;
mod services;
mod state;
mod web;

use crate::config::Config;
use crate::state::{AppState, SessionStore, SharedState};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| {
        tracing::error!("Invalid configuration: {:#}", e);
        e
    })?;
    tracing::info!("Using model {} (max {} tokens)", config.model, config.max_tokens);

    let ai = Arc::new(services::ai::AiService::new(&config));
    let shared: SharedState = Arc::new(AppState {
        ai,
        sessions: SessionStore::new(),
        session_ttl: chrono::Duration::minutes(config.session_ttl_minutes),
    });

    // Idle session cleanup - every 10 minutes
    let scheduler = JobScheduler::new().await?;
    let shared_for_cleanup = shared.clone();
    scheduler
        .add(Job::new_async("0 */10 * * * *", move |_uuid, _l| {
            let state = shared_for_cleanup.clone();
            Box::pin(async move {
                let removed = state
                    .sessions
                    .remove_idle(state.session_ttl, chrono::Utc::now())
                    .await;
                if removed > 0 {
                    tracing::info!(
                        "Cleaned up {} idle analysis sessions ({} active)",
                        removed,
                        state.sessions.len().await
                    );
                }
            })
        })?)
        .await?;
    scheduler.start().await?;
    tracing::info!(
        "Scheduler started: idle session cleanup every 10 min (ttl {} min)",
        config.session_ttl_minutes
    );

    let app = web::routes(shared)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    tracing::info!("Listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
