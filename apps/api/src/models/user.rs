use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Account kind. Job seekers are `user`; employers are `hr`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Hr,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Hr => "hr",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
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
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub fn is_hr(&self) -> bool {
        self.role == UserRole::Hr.as_str()
    }
}

/// Public identity returned by the auth endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl From<&UserRow> for UserSummary {
    fn from(u: &UserRow) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.clone(),
        }
    }
}
