use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::notification::NotificationRow;
use crate::state::AppState;

const PAGE_SIZE: i64 = 50;

/// GET /notifications/:user_id
pub async fn handle_list_notifications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<NotificationRow>>, AppError> {
    let rows = sqlx::query_as::<_, NotificationRow>(
        "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(user_id)
    .bind(PAGE_SIZE)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(rows))
}

/// PATCH /notifications/:id/read
///
/// An unknown id is not an error.
pub async fn handle_mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    sqlx::query("UPDATE notifications SET read = TRUE WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    Ok(Json(json!({ "message": "ok" })))
}

/// POST /notifications/read-all/:user_id
pub async fn handle_mark_all_read(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    sqlx::query("UPDATE notifications SET read = TRUE WHERE user_id = $1 AND read = FALSE")
        .bind(user_id)
        .execute(&state.db)
        .await?;
    Ok(Json(json!({ "message": "All marked as read." })))
}
