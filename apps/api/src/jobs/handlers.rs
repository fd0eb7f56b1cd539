//! Axum route handlers for the job feed and swipes.

use std::collections::HashSet;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::catalog::{unseen_jobs, JobListing};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub user_id: Uuid,
    pub job_id: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub description: String,
}

/// GET /jobs/:user_id
///
/// Jobs the user has not swiped on yet, static catalog first.
pub async fn handle_get_feed(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<JobListing>>, AppError> {
    let all_jobs = state.catalog.all_jobs(&state.db).await?;

    let seen: HashSet<String> = sqlx::query_scalar(
        "SELECT job_id FROM applications WHERE user_id = $1 \
         UNION SELECT job_id FROM swiped_left WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?
    .into_iter()
    .collect();

    Ok(Json(unseen_jobs(all_jobs, &seen)))
}

/// POST /swipe-right
///
/// Saves the job as an application. Résumé generation is triggered separately.
pub async fn handle_swipe_right(
    State(state): State<AppState>,
    Json(swipe): Json<SwipeRequest>,
) -> Result<Json<Value>, AppError> {
    let application_id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO applications (id, user_id, job_id, job_title, description, status)
        VALUES ($1, $2, $3, $4, $5, 'saved')
        "#,
    )
    .bind(application_id)
    .bind(swipe.user_id)
    .bind(&swipe.job_id)
    .bind(&swipe.job_title)
    .bind(&swipe.description)
    .execute(&state.db)
    .await?;

    info!("User {} saved job {} as application {application_id}", swipe.user_id, swipe.job_id);
    Ok(Json(json!({
        "message": "Job saved!",
        "job": swipe.job_title,
        "application_id": application_id,
    })))
}

/// POST /swipe-left
pub async fn handle_swipe_left(
    State(state): State<AppState>,
    Json(swipe): Json<SwipeRequest>,
) -> Result<Json<Value>, AppError> {
    sqlx::query("INSERT INTO swiped_left (id, user_id, job_id) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(swipe.user_id)
        .bind(&swipe.job_id)
        .execute(&state.db)
        .await?;
    Ok(Json(json!({ "message": "Job dismissed." })))
}
