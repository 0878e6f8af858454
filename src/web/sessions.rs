use crate::domain::severity::{classify_set, ClassifiedScore};
use crate::domain::ConditionScoreSet;
use crate::error::ApiError;
use crate::services::support::{support_services, ContactOption, SupportServices};
use crate::services::{chart, report};
use crate::state::{AnalysisSession, SharedState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
struct SessionView {
    #[serde(flatten)]
    session: AnalysisSession,
    results: Vec<ClassifiedScore>,
}

impl From<AnalysisSession> for SessionView {
    fn from(session: AnalysisSession) -> Self {
        let results = classify_set(&session.model_data);
        Self { session, results }
    }
}

#[derive(Debug, Deserialize)]
struct ChatPayload {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ContactPayload {
    option: ContactOption,
    contact: Option<String>,
}

#[derive(Debug, Serialize)]
struct ContactResponse {
    option: ContactOption,
    label: &'static str,
    message: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session))
        .route("/:id/data", post(receive_new_data))
        .route("/:id/chart", get(get_chart))
        .route("/:id/analyze", post(analyze_session))
        .route("/:id/chat/start", post(start_chat))
        .route("/:id/chat", post(send_chat_message))
        .route("/:id/services", post(show_services))
        .route("/:id/contact", post(contact_support))
        .with_state(state)
}

async fn load(state: &SharedState, id: Uuid) -> Result<AnalysisSession, ApiError> {
    state.sessions.get(id).await.ok_or(ApiError::SessionNotFound(id))
}

async fn create_session(
    State(state): State<SharedState>,
) -> (StatusCode, Json<SessionView>) {
    let session = AnalysisSession::new(ConditionScoreSet::synthetic());
    tracing::info!("Created analysis session {}", session.id);
    state.sessions.insert(session.clone()).await;
    (StatusCode::CREATED, Json(session.into()))
}

async fn get_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let session = load(&state, id).await?;
    Ok(Json(session.into()))
}

async fn receive_new_data(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let data = ConditionScoreSet::synthetic();
    let (session, _) = state
        .sessions
        .update(id, |s| s.replace_data(data))
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    tracing::debug!("Session {} received new data", id);
    Ok(Json(session.into()))
}

async fn get_chart(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = load(&state, id).await?;
    Ok(Json(chart::pie_chart_spec(&session.model_data)))
}

async fn analyze_session(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let snapshot = load(&state, id).await?;

    tracing::info!("Analyzing session {}", id);
    let analysis = report::analyze(state.ai.as_ref(), &snapshot.model_data)
        .await
        .map_err(ApiError::Generation)?;

    let (session, _) = state
        .sessions
        .update(id, |s| s.complete_analysis(analysis))
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    Ok(Json(session.into()))
}

async fn start_chat(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let (session, outcome) = state
        .sessions
        .update(id, |s| {
            if !s.analysis_complete {
                return Err(ApiError::AnalysisRequired);
            }
            s.start_chat();
            Ok(())
        })
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    outcome?;
    Ok(Json(session.into()))
}

async fn send_chat_message(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChatPayload>,
) -> Result<Json<SessionView>, ApiError> {
    let message = payload.message.trim().to_string();

    let (session, ticket) = state
        .sessions
        .update(id, |s| {
            if !s.analysis_complete {
                return Err(ApiError::AnalysisRequired);
            }
            if !s.show_chat {
                return Err(ApiError::ChatNotStarted);
            }
            if message.is_empty() {
                return Ok(None);
            }
            let ticket = s.push_user_turn(message);
            Ok(Some(ticket))
        })
        .await
        .ok_or(ApiError::SessionNotFound(id))?;

    let Some(ticket) = ticket? else {
        return Ok(Json(session.into()));
    };
    let history = session.chat_history;

    let reply = report::chat_reply(state.ai.as_ref(), &history)
        .await
        .map_err(ApiError::Generation)?;

    let (session, stored) = state
        .sessions
        .update(id, |s| s.push_reply(ticket, reply))
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    if !stored {
        tracing::warn!("Dropped chat reply for session {}: chat changed meanwhile", id);
        return Err(ApiError::ChatInterrupted);
    }
    Ok(Json(session.into()))
}

async fn show_services(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupportServices>, ApiError> {
    state
        .sessions
        .update(id, AnalysisSession::show_services)
        .await
        .ok_or(ApiError::SessionNotFound(id))?;
    tracing::debug!("Support services shown for session {}", id);
    Ok(Json(support_services()))
}

async fn contact_support(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ContactPayload>,
) -> Result<Json<ContactResponse>, ApiError> {
    let session = load(&state, id).await?;
    if !session.analysis_complete {
        return Err(ApiError::AnalysisRequired);
    }

    let message = payload.option.acknowledge(payload.contact.as_deref())?;
    tracing::info!("Session {} chose contact option {:?}", id, payload.option);
    Ok(Json(ContactResponse {
        option: payload.option,
        label: payload.option.label(),
        message,
    }))
}
