//! Axum route handlers for saved applications.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::{
    claim_for_generation, delete_application, find_application, list_for_user, set_notes,
    set_status, ApplicationView,
};
use crate::errors::AppError;
use crate::jobs::catalog::find_hr_job;
use crate::models::application::{ApplicationRow, ApplicationStatus};
use crate::notifications::{applicant_message, create_notification, LINK_HR};
use crate::profile::find_user;
use crate::resume::queue::revert_to_saved;
use crate::resume::render::{compile_pdf, is_latex_document};
use crate::resume::{CandidateProfile, ResumeJob};
use crate::state::AppState;

fn not_found() -> AppError {
    AppError::NotFound("Application not found".to_string())
}

/// An unknown application is reported before a bad status value.
fn checked_status(
    application: Option<&ApplicationRow>,
    raw: &str,
) -> Result<ApplicationStatus, AppError> {
    application.ok_or_else(not_found)?;
    raw.parse().map_err(AppError::Validation)
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesRequest {
    #[serde(default)]
    pub notes: String,
}

/// GET /dashboard/:user_id
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ApplicationView>>, AppError> {
    let jobs = state.catalog.lookup(&state.db).await?;
    let views = list_for_user(&state.db, user_id)
        .await?
        .into_iter()
        .map(|a| {
            let job = jobs.get(&a.job_id);
            ApplicationView::new(a, job)
        })
        .collect();
    Ok(Json(views))
}

/// GET /application/:app_id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
) -> Result<Json<ApplicationView>, AppError> {
    let application = find_application(&state.db, app_id).await?.ok_or_else(not_found)?;
    let jobs = state.catalog.lookup(&state.db).await?;
    let job = jobs.get(&application.job_id);
    Ok(Json(ApplicationView::new(application, job)))
}

/// DELETE /application/:app_id
pub async fn handle_delete_application(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if !delete_application(&state.db, app_id).await? {
        return Err(not_found());
    }
    info!("Deleted application {app_id}");
    Ok(Json(json!({ "message": "Application removed." })))
}

/// PATCH /application/:app_id/status?status=
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<Value>, AppError> {
    let application = find_application(&state.db, app_id).await?;
    let status = checked_status(application.as_ref(), &query.status)?;
    if !set_status(&state.db, app_id, status.as_str()).await? {
        return Err(not_found());
    }
    Ok(Json(json!({ "message": format!("Status updated to {status}.") })))
}

/// PUT /application/:app_id/notes
pub async fn handle_update_notes(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
    Json(body): Json<NotesRequest>,
) -> Result<Json<Value>, AppError> {
    if !set_notes(&state.db, app_id, &body.notes).await? {
        return Err(not_found());
    }
    Ok(Json(json!({ "message": "Notes saved." })))
}

/// POST /application/:app_id/apply
///
/// Marks the application applied. For Kanso-posted jobs the posting HR
/// account is notified.
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let application = find_application(&state.db, app_id).await?.ok_or_else(not_found)?;
    set_status(&state.db, app_id, ApplicationStatus::Applied.as_str()).await?;

    let hr_job = find_hr_job(&state.db, &application.job_id).await?;
    let is_internal = hr_job.is_some();
    if let Some(job) = hr_job {
        let applicant_name = find_user(&state.db, application.user_id)
            .await?
            .map(|u| u.name)
            .unwrap_or_else(|| "Someone".to_string());
        let (title, body) = applicant_message(&applicant_name, &application.job_title, &job.company);
        create_notification(&state.db, job.posted_by, &title, &body, LINK_HR).await?;
        info!("Notified HR {} of applicant for {}", job.posted_by, job.id);
    }

    let message = if is_internal {
        "Application submitted! 🎉"
    } else {
        "Application marked as applied! 🎉"
    };
    Ok(Json(json!({ "message": message, "is_internal": is_internal })))
}

/// POST /generate-resume/:app_id?user_id=
///
/// Claims the application and queues tailoring in the background.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
    Query(query): Query<GenerateQuery>,
) -> Result<Json<Value>, AppError> {
    let application = find_application(&state.db, app_id).await?.ok_or_else(not_found)?;
    if application.status == ApplicationStatus::Processing.as_str() {
        return Ok(Json(json!({ "message": "Resume is already being generated." })));
    }
    state.llm.model()?;

    let Some(claimed) = claim_for_generation(&state.db, app_id).await? else {
        // Lost a race with another trigger, or the status moved on to `applied`.
        return match find_application(&state.db, app_id).await? {
            Some(a) if a.status == ApplicationStatus::Processing.as_str() => {
                Ok(Json(json!({ "message": "Resume is already being generated." })))
            }
            Some(a) => Err(AppError::Validation(format!(
                "Cannot generate a resume for an application with status '{}'",
                a.status
            ))),
            None => Err(not_found()),
        };
    };

    let candidate = find_user(&state.db, query.user_id)
        .await?
        .map(|u| CandidateProfile::from(&u))
        .unwrap_or_default();

    let job = ResumeJob {
        application_id: app_id,
        job_title: claimed.job_title,
        description: claimed.description,
        candidate,
    };
    if let Err(e) = state.resume_queue.enqueue(job).await {
        warn!("Could not queue résumé for {app_id}; releasing claim");
        revert_to_saved(&state.db, app_id).await?;
        return Err(e);
    }

    info!("Queued résumé generation for application {app_id}");
    Ok(Json(json!({ "message": "Resume generation started." })))
}

/// GET /application/:app_id/resume-pdf
pub async fn handle_resume_pdf(
    State(state): State<AppState>,
    Path(app_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let latex = find_application(&state.db, app_id)
        .await?
        .map(|a| a.tailored_resume)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::NotFound("No resume found".to_string()))?;

    if !is_latex_document(&latex) {
        return Err(AppError::Validation("Resume is not in LaTeX format".to_string()));
    }

    let pdf = compile_pdf(&state.config.pdflatex_bin, &latex).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(app_id)),
        ],
        pdf,
    )
        .into_response())
}

fn content_disposition(app_id: Uuid) -> String {
    let short: String = app_id.to_string().chars().take(8).collect();
    format!("inline; filename=\"resume-{short}.pdf\"")
}
