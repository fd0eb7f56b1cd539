//! Axum route handlers for profiles and CV parsing.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::UserRow;
use crate::profile::find_user;
use crate::profile::parser::{parse_resume_text, ResumeSections};
use crate::state::AppState;

/// Full overwrite of the editable profile fields. Omitted fields are cleared.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ProfileUpdateRequest {
    pub headline: String,
    pub bio: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub portfolio: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub resume_text: String,
    pub profile_image: String,
    pub company_name: String,
    pub company_role: String,
    pub company_desc: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseTextRequest {
    pub text: String,
}

/// GET /profile/:user_id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserRow>, AppError> {
    let user = find_user(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(user))
}

/// PUT /profile/:user_id
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<ProfileUpdateRequest>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE users SET
            headline = $2, bio = $3, phone = $4, location = $5, linkedin = $6,
            github = $7, portfolio = $8, skills = $9, experience = $10, education = $11,
            resume_text = $12, profile_image = $13, company_name = $14,
            company_role = $15, company_desc = $16
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(&req.headline)
    .bind(&req.bio)
    .bind(&req.phone)
    .bind(&req.location)
    .bind(&req.linkedin)
    .bind(&req.github)
    .bind(&req.portfolio)
    .bind(&req.skills)
    .bind(&req.experience)
    .bind(&req.education)
    .bind(&req.resume_text)
    .bind(&req.profile_image)
    .bind(&req.company_name)
    .bind(&req.company_role)
    .bind(&req.company_desc)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }
    Ok(Json(json!({ "message": "Profile updated." })))
}

/// POST /parse-resume-text
///
/// Segments already-extracted CV text. No AI call.
pub async fn handle_parse_resume_text(
    Json(req): Json<ParseTextRequest>,
) -> Result<Json<ResumeSections>, AppError> {
    if req.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }
    Ok(Json(parse_resume_text(&req.text)))
}

/// POST /parse-linkedin
///
/// Accepts a multipart `file` field holding a LinkedIn/CV PDF, extracts its
/// text and segments it. No AI call.
pub async fn handle_parse_linkedin(
    mut multipart: Multipart,
) -> Result<Json<ResumeSections>, AppError> {
    let pdf = read_pdf_field(&mut multipart).await?;
    info!("Extracting text from uploaded PDF ({} bytes)", pdf.len());

    // pdf-extract is CPU-bound and synchronous.
    let extracted = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&pdf))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?
        .map_err(|e| {
            error!("PDF extraction error: {e:?}");
            AppError::Validation(
                "Could not read the PDF. Make sure it's a valid PDF file.".to_string(),
            )
        })?;

    if extracted.trim().is_empty() {
        return Err(AppError::Validation(
            "No text found in the PDF. The file may be image-based.".to_string(),
        ));
    }

    Ok(Json(parse_resume_text(&extracted)))
}

async fn read_pdf_field(multipart: &mut Multipart) -> Result<Bytes, AppError> {
    let not_pdf = || AppError::Validation("Please upload a PDF file.".to_string());

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_lowercase();
        if !filename.ends_with(".pdf") {
            return Err(not_pdf());
        }
        return field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {e}")));
    }
    Err(not_pdf())
}
