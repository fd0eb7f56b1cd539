//! Job catalog: static postings from `JOBS_FILE` merged with `hr_jobs` rows.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::job::HrJobRow;

pub const SOURCE_EXTERNAL: &str = "external";
pub const SOURCE_KANSO: &str = "kanso";

fn default_source() -> String {
    SOURCE_EXTERNAL.to_string()
}

/// A job as shown in the feed, regardless of where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "type", default)]
    pub job_type: String,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_by: Option<Uuid>,
}

impl From<&HrJobRow> for JobListing {
    fn from(h: &HrJobRow) -> Self {
        Self {
            id: h.id.clone(),
            company: h.company.clone(),
            logo: h.logo.clone(),
            title: h.title.clone(),
            location: h.location.clone(),
            job_type: h.job_type.clone(),
            salary: h.salary.clone(),
            summary: h.summary.clone(),
            description: h.description.clone(),
            tags: h.tags.clone(),
            source: SOURCE_KANSO.to_string(),
            posted_by: Some(h.posted_by),
        }
    }
}

/// Static postings loaded once at startup. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    static_jobs: Arc<Vec<JobListing>>,
}

impl JobCatalog {
    /// Loads a JSON array of postings. A missing file yields an empty catalog;
    /// a malformed one is a startup error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Jobs file {} not found; static catalog is empty", path.display());
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read jobs file {}", path.display()))?;
        let jobs: Vec<JobListing> = serde_json::from_str(&raw)
            .with_context(|| format!("Jobs file {} is not a valid job array", path.display()))?;
        info!("Loaded {} static jobs from {}", jobs.len(), path.display());
        Ok(Self::from_listings(jobs))
    }

    pub fn from_listings(jobs: Vec<JobListing>) -> Self {
        Self {
            static_jobs: Arc::new(jobs),
        }
    }

    pub fn static_jobs(&self) -> &[JobListing] {
        &self.static_jobs
    }

    /// Static jobs followed by every HR-posted job.
    pub async fn all_jobs(&self, pool: &PgPool) -> Result<Vec<JobListing>, sqlx::Error> {
        let hr_jobs = list_hr_jobs(pool).await?;
        let mut jobs = self.static_jobs().to_vec();
        jobs.extend(hr_jobs.iter().map(JobListing::from));
        Ok(jobs)
    }

    /// job_id → listing. HR jobs shadow static ones with the same id.
    pub async fn lookup(&self, pool: &PgPool) -> Result<HashMap<String, JobListing>, sqlx::Error> {
        Ok(self
            .all_jobs(pool)
            .await?
            .into_iter()
            .map(|j| (j.id.clone(), j))
            .collect())
    }
}

pub async fn list_hr_jobs(pool: &PgPool) -> Result<Vec<HrJobRow>, sqlx::Error> {
    sqlx::query_as::<_, HrJobRow>("SELECT * FROM hr_jobs ORDER BY created_at")
        .fetch_all(pool)
        .await
}

pub async fn find_hr_job(pool: &PgPool, job_id: &str) -> Result<Option<HrJobRow>, sqlx::Error> {
    sqlx::query_as::<_, HrJobRow>("SELECT * FROM hr_jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await
}

/// Drops jobs whose id the user already swiped on, keeping order.
pub fn unseen_jobs(jobs: Vec<JobListing>, seen: &HashSet<String>) -> Vec<JobListing> {
    jobs.into_iter().filter(|j| !seen.contains(&j.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str) -> JobListing {
        serde_json::from_value(serde_json::json!({ "id": id, "title": "Engineer" })).unwrap()
    }

    #[test]
    fn test_static_listing_defaults_to_external_source() {
        let job = listing("ext-1");
        assert_eq!(job.source, SOURCE_EXTERNAL);
        assert!(job.tags.is_empty());
        assert!(job.posted_by.is_none());
    }

    #[test]
    fn test_type_field_round_trips_as_type() {
        let job: JobListing =
            serde_json::from_str(r#"{"id": "x", "type": "Contract"}"#).unwrap();
        assert_eq!(job.job_type, "Contract");
        let value = serde_json::to_value(&job).unwrap();
        assert_eq!(value["type"], "Contract");
        assert!(value.get("posted_by").is_none());
    }

    #[test]
    fn test_unseen_jobs_filters_swiped_and_keeps_order() {
        let jobs = vec![listing("a"), listing("b"), listing("c")];
        let seen: HashSet<String> = ["b".to_string()].into_iter().collect();
        let ids: Vec<_> = unseen_jobs(jobs, &seen).into_iter().map(|j| j.id).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let catalog = JobCatalog::load("/definitely/not/here/jobs.json").unwrap();
        assert!(catalog.static_jobs().is_empty());
    }

    #[test]
    fn test_load_reads_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, r#"[{"id": "ext-1", "company": "Acme", "tags": ["Rust"]}]"#)
            .unwrap();
        let catalog = JobCatalog::load(&path).unwrap();
        assert_eq!(catalog.static_jobs().len(), 1);
        assert_eq!(catalog.static_jobs()[0].company, "Acme");
    }

    #[test]
    fn test_load_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(JobCatalog::load(&path).is_err());
    }
}
