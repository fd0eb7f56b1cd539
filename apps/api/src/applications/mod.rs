// Saved jobs ("applications"): dashboard, lifecycle status, notes, apply,
// and the résumé generation trigger / PDF download.

pub mod handlers;

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::jobs::catalog::{JobListing, SOURCE_EXTERNAL};
use crate::models::application::ApplicationRow;

/// An application enriched with the metadata of the job it points at.
/// Jobs that no longer exist contribute empty fields.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub company: String,
    pub logo: String,
    pub location: String,
    pub salary: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub tags: Vec<String>,
    pub source: String,
}

impl ApplicationView {
    pub fn new(application: ApplicationRow, job: Option<&JobListing>) -> Self {
        match job {
            Some(job) => Self {
                application,
                company: job.company.clone(),
                logo: job.logo.clone(),
                location: job.location.clone(),
                salary: job.salary.clone(),
                job_type: job.job_type.clone(),
                tags: job.tags.clone(),
                source: job.source.clone(),
            },
            None => Self {
                application,
                company: String::new(),
                logo: String::new(),
                location: String::new(),
                salary: String::new(),
                job_type: String::new(),
                tags: Vec::new(),
                source: SOURCE_EXTERNAL.to_string(),
            },
        }
    }
}

pub async fn find_application(
    pool: &PgPool,
    app_id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(app_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Atomically moves a `saved` or `ready` application to `processing`.
/// `None` when another request already claimed it (or it was applied/deleted).
pub async fn claim_for_generation(
    pool: &PgPool,
    app_id: Uuid,
) -> Result<Option<ApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        UPDATE applications SET status = 'processing'
        WHERE id = $1 AND status IN ('saved', 'ready')
        RETURNING *
        "#,
    )
    .bind(app_id)
    .fetch_optional(pool)
    .await
}

/// Returns false when no such application exists.
pub async fn set_status(pool: &PgPool, app_id: Uuid, status: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE applications SET status = $2 WHERE id = $1")
        .bind(app_id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn set_notes(pool: &PgPool, app_id: Uuid, notes: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE applications SET notes = $2 WHERE id = $1")
        .bind(app_id)
        .bind(notes)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Chat messages go first; the two deletes are not wrapped in a transaction.
pub async fn delete_application(pool: &PgPool, app_id: Uuid) -> Result<bool, sqlx::Error> {
    sqlx::query("DELETE FROM chat_messages WHERE application_id = $1")
        .bind(app_id)
        .execute(pool)
        .await?;
    let result = sqlx::query("DELETE FROM applications WHERE id = $1")
        .bind(app_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
