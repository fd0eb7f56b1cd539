use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of a saved job: saved → processing → ready → applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Saved,
    Processing,
    Ready,
    Applied,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Saved => "saved",
            ApplicationStatus::Processing => "processing",
            ApplicationStatus::Ready => "ready",
            ApplicationStatus::Applied => "applied",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "saved" => Ok(ApplicationStatus::Saved),
            "processing" => Ok(ApplicationStatus::Processing),
            "ready" => Ok(ApplicationStatus::Ready),
            "applied" => Ok(ApplicationStatus::Applied),
            other => Err(format!("Invalid status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub job_id: String,
    pub job_title: String,
    pub description: String,
    pub tailored_resume: String,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}
