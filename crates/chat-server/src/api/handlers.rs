//! HTTP request handlers.

use super::types::*;
use super::AppState;
use crate::error::ChatError;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use openai_client::Message;
use serde_json::Value;
use session_store::TurnRole;
use tracing::info;

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sessions: state.sessions.session_count().await,
    })
}

/// Stateless chat: the client sends the whole conversation.
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let Json(body) = payload?;
    let messages = body
        .get("messages")
        .filter(|m| m.is_array())
        .cloned()
        .ok_or_else(|| ChatError::InvalidRequest("Messages array is required.".into()))?;

    let messages: Vec<ChatMessage> = serde_json::from_value(messages)
        .map_err(|e| ChatError::InvalidRequest(format!("Malformed message: {}", e)))?;

    let history: Vec<Message> = messages.into_iter().map(Message::from).collect();
    let response = state.agent.respond(history).await?;

    Ok(Json(ChatResponse { response }))
}

/// Start a new session.
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let id = uuid::Uuid::new_v4().to_string();
    state.sessions.create(&id).await;
    info!(session_id = %id, "Session created");

    (StatusCode::CREATED, Json(SessionCreated { session_id: id }))
}

/// Answer a user message in the context of a session.
///
/// Both turns are stored only once the model has answered.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SessionReply>, ChatError> {
    let Json(request) = payload?;
    if request.message.trim().is_empty() {
        return Err(ChatError::InvalidRequest("Message is required.".into()));
    }

    let mut history = state.sessions.history_messages(&id, None).await;
    history.push(Message::user(request.message.as_str()));

    let response = state.agent.respond(history).await?;
    state.sessions.append(&id, TurnRole::User, &request.message).await;
    state.sessions.append(&id, TurnRole::Assistant, &response).await;

    Ok(Json(SessionReply {
        session_id: id,
        response,
    }))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionView>, ChatError> {
    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or(ChatError::SessionNotFound(id))?;

    Ok(Json(SessionView {
        session_id: session.id,
        turns: session.turns,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ChatError> {
    if state.sessions.clear(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ChatError::SessionNotFound(id))
    }
}
