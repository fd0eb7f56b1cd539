use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{UserRole, UserRow, UserSummary};
use crate::profile::find_user_by_email;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

/// POST /auth/register
///
/// Registering an email that already exists returns the existing account.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserSummary>, AppError> {
    let email = req.email.trim();
    if email.is_empty() || req.name.trim().is_empty() {
        return Err(AppError::Validation("name and email are required".to_string()));
    }

    if let Some(existing) = find_user_by_email(&state.db, email).await? {
        return Ok(Json(UserSummary::from(&existing)));
    }

    let user = sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (id, name, email, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.name.trim())
    .bind(email)
    .bind(req.role.as_str())
    .fetch_one(&state.db)
    .await?;

    info!("Registered {} account {}", user.role, user.id);
    Ok(Json(UserSummary::from(&user)))
}

/// POST /auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<UserSummary>, AppError> {
    let user = find_user_by_email(&state.db, req.email.trim())
        .await?
        .ok_or_else(|| {
            AppError::NotFound("No account with that email. Please register first.".to_string())
        })?;
    Ok(Json(UserSummary::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_role_defaults_to_user() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name": "Ann", "email": "ann@example.com"}"#).unwrap();
        assert_eq!(req.role, UserRole::User);
    }

    #[test]
    fn test_register_accepts_hr_role() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name": "Bo", "email": "bo@example.com", "role": "hr"}"#)
                .unwrap();
        assert_eq!(req.role, UserRole::Hr);
    }

    #[test]
    fn test_register_rejects_unknown_role() {
        let result: Result<RegisterRequest, _> =
            serde_json::from_str(r#"{"name": "Cy", "email": "cy@example.com", "role": "admin"}"#);
        assert!(result.is_err());
    }
}
