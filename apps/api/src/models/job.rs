use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A job posted from within Kanso by an HR account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HrJobRow {
    pub id: String,
    pub posted_by: Uuid,
    pub company: String,
    pub logo: String,
    pub title: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary: String,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
