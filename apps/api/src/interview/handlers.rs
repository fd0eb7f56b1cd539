//! Axum route handlers for interview feedback.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use crate::applications::find_application;
use crate::errors::AppError;
use crate::interview::feedback::{build_feedback_prompt, insert_feedback, list_feedback, FeedbackReport};
use crate::llm_client::LlmInput;
use crate::models::interview::InterviewFeedbackRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub application_id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub duration_seconds: i32,
}

/// POST /interview/feedback
///
/// Always stores a record: the fixed no-transcript report when AI is off or
/// nothing was said, the failure report when the model call or its JSON fails.
pub async fn handle_create_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<InterviewFeedbackRow>, AppError> {
    let report = if !state.llm.is_enabled() || req.transcript.trim().is_empty() {
        FeedbackReport::no_transcript()
    } else {
        let job_title = find_application(&state.db, req.application_id)
            .await?
            .map(|a| a.job_title)
            .unwrap_or_else(|| "the role".to_string());
        let prompt = build_feedback_prompt(&job_title, &req.transcript);
        match state.llm.invoke_json::<FeedbackReport>(LlmInput::Prompt(&prompt)).await {
            Ok(report) => report,
            Err(e) => {
                error!("Feedback generation failed for {}: {e}", req.application_id);
                FeedbackReport::failed()
            }
        }
    };

    let row = insert_feedback(
        &state.db,
        req.application_id,
        req.user_id,
        &report,
        &req.transcript,
        req.duration_seconds,
    )
    .await?;
    Ok(Json(row))
}

/// GET /interview/feedback/:application_id
pub async fn handle_list_feedback(
    State(state): State<AppState>,
    Path(application_id): Path<Uuid>,
) -> Result<Json<Vec<InterviewFeedbackRow>>, AppError> {
    Ok(Json(list_feedback(&state.db, application_id).await?))
}
