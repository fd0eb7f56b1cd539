use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewFeedbackRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub user_id: Uuid,
    pub score: String,
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub transcript: String,
    pub duration_seconds: i32,
    pub created_at: DateTime<Utc>,
}
