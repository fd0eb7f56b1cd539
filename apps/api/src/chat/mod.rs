// AI-HR chat: persona lookup, prompt assembly, persisted message history.

pub mod handlers;
pub mod prompts;

use sqlx::PgPool;
use uuid::Uuid;

use crate::llm_client::Role;
use crate::models::chat::{ChatMessageRow, HrPersonalityRow};

/// Messages replayed to the model on each chat turn.
pub const HISTORY_WINDOW: i64 = 10;

/// Escapes `\`, `%` and `_` so user input matches literally inside ILIKE.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// First persona whose company contains `company` (case-insensitive).
/// Empty input matches nothing.
pub async fn find_personality(
    pool: &PgPool,
    company: &str,
) -> Result<Option<HrPersonalityRow>, sqlx::Error> {
    if company.is_empty() {
        return Ok(None);
    }
    sqlx::query_as::<_, HrPersonalityRow>(
        "SELECT * FROM hr_personalities WHERE company ILIKE $1 ORDER BY created_at, id LIMIT 1",
    )
    .bind(format!("%{}%", escape_like(company)))
    .fetch_optional(pool)
    .await
}

/// Full history, oldest first.
pub async fn list_messages(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<ChatMessageRow>, sqlx::Error> {
    sqlx::query_as::<_, ChatMessageRow>(
        "SELECT * FROM chat_messages WHERE application_id = $1 ORDER BY created_at ASC",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

/// The newest `limit` messages, returned oldest first.
pub async fn recent_messages(
    pool: &PgPool,
    application_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessageRow>, sqlx::Error> {
    let mut rows = sqlx::query_as::<_, ChatMessageRow>(
        "SELECT * FROM chat_messages WHERE application_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(application_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    rows.reverse();
    Ok(rows)
}

pub async fn save_message(
    pool: &PgPool,
    application_id: Uuid,
    role: Role,
    content: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO chat_messages (id, application_id, role, content) VALUES ($1, $2, $3, $4)",
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(role.as_str())
    .bind(content)
    .execute(pool)
    .await?;
    Ok(())
}
