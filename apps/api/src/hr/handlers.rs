//! Axum route handlers for HR accounts.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::FromRow;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::hr::new_job_id;
use crate::models::job::HrJobRow;
use crate::notifications::notify_matching_seekers;
use crate::profile::find_user;
use crate::state::AppState;

fn default_job_type() -> String {
    "Full-time".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PostJobRequest {
    pub user_id: Uuid,
    pub company: String,
    #[serde(default)]
    pub logo: String,
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default = "default_job_type")]
    pub job_type: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub summary: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: Uuid,
}

/// An `applied` application joined with its job and applicant.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicantRow {
    pub id: Uuid,
    pub job_id: String,
    pub job_title: String,
    pub tailored_resume: String,
    pub created_at: DateTime<Utc>,
    pub company: String,
    pub applicant_name: Option<String>,
    pub applicant_email: Option<String>,
    pub applicant_headline: Option<String>,
    pub applicant_skills: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct ApplicantView {
    pub id: Uuid,
    pub job_title: String,
    pub job_id: String,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applicant_headline: String,
    pub applicant_skills: Vec<String>,
    pub has_resume: bool,
    pub resume_app_id: Option<Uuid>,
    pub applied_at: DateTime<Utc>,
    pub company: String,
}

impl From<ApplicantRow> for ApplicantView {
    fn from(r: ApplicantRow) -> Self {
        let has_resume = !r.tailored_resume.is_empty();
        Self {
            id: r.id,
            job_title: r.job_title,
            job_id: r.job_id,
            applicant_name: r.applicant_name.unwrap_or_else(|| "Unknown".to_string()),
            applicant_email: r.applicant_email.unwrap_or_default(),
            applicant_headline: r.applicant_headline.unwrap_or_default(),
            applicant_skills: r.applicant_skills.unwrap_or_default(),
            has_resume,
            resume_app_id: has_resume.then_some(r.id),
            applied_at: r.created_at,
            company: r.company,
        }
    }
}

/// POST /hr/post-job
pub async fn handle_post_job(
    State(state): State<AppState>,
    Json(req): Json<PostJobRequest>,
) -> Result<Json<Value>, AppError> {
    let is_hr = find_user(&state.db, req.user_id)
        .await?
        .is_some_and(|u| u.is_hr());
    if !is_hr {
        return Err(AppError::Forbidden("Only HR accounts can post jobs.".to_string()));
    }

    let job = sqlx::query_as::<_, HrJobRow>(
        r#"
        INSERT INTO hr_jobs
            (id, posted_by, company, logo, title, location, job_type, salary, summary, description, tags)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(new_job_id())
    .bind(req.user_id)
    .bind(&req.company)
    .bind(&req.logo)
    .bind(&req.title)
    .bind(&req.location)
    .bind(&req.job_type)
    .bind(&req.salary)
    .bind(&req.summary)
    .bind(&req.description)
    .bind(&req.tags)
    .fetch_one(&state.db)
    .await?;

    info!("HR {} posted job {}", req.user_id, job.id);
    notify_matching_seekers(&state.db, &job).await?;

    Ok(Json(json!({ "message": "Job posted!", "job_id": job.id })))
}

/// GET /hr/my-jobs/:user_id
pub async fn handle_my_jobs(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<HrJobRow>>, AppError> {
    let jobs = sqlx::query_as::<_, HrJobRow>(
        "SELECT * FROM hr_jobs WHERE posted_by = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;
    Ok(Json(jobs))
}

/// DELETE /hr/job/:job_id?user_id=
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
    Query(owner): Query<OwnerQuery>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM hr_jobs WHERE id = $1 AND posted_by = $2")
        .bind(&job_id)
        .bind(owner.user_id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Job not found or you don't own it.".to_string()));
    }
    info!("HR {} removed job {job_id}", owner.user_id);
    Ok(Json(json!({ "message": "Job removed." })))
}

/// GET /hr/applications/:user_id
///
/// Submitted applications to any job this HR account posted, newest first.
pub async fn handle_hr_applications(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicantView>>, AppError> {
    let rows = sqlx::query_as::<_, ApplicantRow>(
        r#"
        SELECT a.id, a.job_id, a.job_title, a.tailored_resume, a.created_at,
               j.company,
               u.name     AS applicant_name,
               u.email    AS applicant_email,
               u.headline AS applicant_headline,
               u.skills   AS applicant_skills
        FROM applications a
        JOIN hr_jobs j ON j.id = a.job_id
        LEFT JOIN users u ON u.id = a.user_id
        WHERE j.posted_by = $1 AND a.status = 'applied'
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(ApplicantView::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(resume: &str, name: Option<&str>) -> ApplicantRow {
        ApplicantRow {
            id: Uuid::new_v4(),
            job_id: "kanso-1a2b3c4d".to_string(),
            job_title: "Data Engineer".to_string(),
            tailored_resume: resume.to_string(),
            created_at: Utc::now(),
            company: "Acme".to_string(),
            applicant_name: name.map(str::to_string),
            applicant_email: None,
            applicant_headline: None,
            applicant_skills: None,
        }
    }

    #[test]
    fn test_applicant_with_resume() {
        let r = row("\\documentclass{article}", Some("Jane"));
        let id = r.id;
        let view = ApplicantView::from(r);
        assert!(view.has_resume);
        assert_eq!(view.resume_app_id, Some(id));
        assert_eq!(view.applicant_name, "Jane");
    }

    #[test]
    fn test_missing_applicant_and_resume() {
        let view = ApplicantView::from(row("", None));
        assert!(!view.has_resume);
        assert_eq!(view.resume_app_id, None);
        assert_eq!(view.applicant_name, "Unknown");
        assert!(view.applicant_skills.is_empty());
    }

    #[test]
    fn test_post_job_defaults() {
        let req: PostJobRequest = serde_json::from_value(serde_json::json!({
            "user_id": Uuid::nil(),
            "company": "Acme",
            "title": "Data Engineer",
            "description": "Pipelines",
        }))
        .unwrap();
        assert_eq!(req.job_type, "Full-time");
        assert!(req.tags.is_empty());
    }
}
