use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::llm_client::{Role, Turn};

/// One persisted HR-chat message. `role` is `user` or `assistant`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessageRow {
    pub id: Uuid,
    pub application_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageRow {
    /// Anything not stored as `user` is replayed as the assistant.
    pub fn to_turn(&self) -> Turn {
        let role = if self.role == Role::User.as_str() {
            Role::User
        } else {
            Role::Assistant
        };
        Turn {
            role,
            content: self.content.clone(),
        }
    }
}

/// Recruiter persona used as the system prompt for chat and live interviews.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HrPersonalityRow {
    pub id: String,
    pub company: String,
    pub hr_name: String,
    pub style: String,
    pub common_questions: Vec<String>,
    pub tone: String,
    pub created_at: DateTime<Utc>,
}
