//! Axum route handlers for HR personas and the AI-HR chat.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::applications::find_application;
use crate::chat::prompts::{build_chat_system_prompt, DEFAULT_HR_NAME, FALLBACK_REPLY};
use crate::chat::{find_personality, list_messages, recent_messages, save_message, HISTORY_WINDOW};
use crate::errors::AppError;
use crate::llm_client::{LlmInput, Role, Turn};
use crate::models::chat::{ChatMessageRow, HrPersonalityRow};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PersonalityView {
    pub id: String,
    pub company: String,
    pub hr_name: String,
    pub tone: String,
    pub common_questions: Vec<String>,
}

impl From<HrPersonalityRow> for PersonalityView {
    fn from(p: HrPersonalityRow) -> Self {
        Self {
            id: p.id,
            company: p.company,
            hr_name: p.hr_name,
            tone: p.tone,
            common_questions: p.common_questions,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub application_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub hr_name: String,
    pub company: String,
}

/// GET /hr-personalities/:company
///
/// Responds with JSON `null` when no persona matches.
pub async fn handle_get_personality(
    State(state): State<AppState>,
    Path(company): Path<String>,
) -> Result<Json<Option<PersonalityView>>, AppError> {
    let personality = find_personality(&state.db, &company).await?;
    Ok(Json(personality.map(PersonalityView::from)))
}

/// GET /chat/:application_id
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Vec<ChatMessageRow>>, AppError> {
    Ok(Json(list_messages(&state.db, application_id).await?))
}

/// POST /chat
///
/// The user message is stored before the model is called; the reply (or the
/// fixed fallback when the model fails) is stored after.
pub async fn handle_chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    state.llm.model()?;

    let application = find_application(&state.db, req.application_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    let jobs = state.catalog.lookup(&state.db).await?;
    let company = jobs
        .get(&application.job_id)
        .map(|j| j.company.clone())
        .unwrap_or_default();
    let personality = find_personality(&state.db, &company).await?;

    let system = build_chat_system_prompt(
        personality.as_ref(),
        &company,
        &application.job_title,
        &application.description,
    );
    let history = recent_messages(&state.db, req.application_id, HISTORY_WINDOW).await?;

    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(Turn::system(system));
    turns.extend(history.iter().map(ChatMessageRow::to_turn));
    turns.push(Turn::user(req.message.as_str()));

    save_message(&state.db, req.application_id, Role::User, &req.message).await?;

    let reply = match state.llm.invoke(LlmInput::Messages(&turns)).await {
        Ok(text) => text,
        Err(e) => {
            error!("HR chat failed for application {}: {e}", req.application_id);
            FALLBACK_REPLY.to_string()
        }
    };

    save_message(&state.db, req.application_id, Role::Assistant, &reply).await?;

    Ok(Json(ChatReply {
        reply,
        hr_name: personality
            .map(|p| p.hr_name)
            .unwrap_or_else(|| DEFAULT_HR_NAME.to_string()),
        company,
    }))
}
