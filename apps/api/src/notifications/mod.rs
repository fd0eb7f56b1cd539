//! In-app notifications.
//!
//! Two producers: applying to a Kanso-posted job notifies the HR who posted
//! it, and posting a job notifies every seeker whose skills overlap its tags.

pub mod handlers;

use std::collections::BTreeSet;

use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::job::HrJobRow;
use crate::models::user::{UserRole, UserRow};

pub const LINK_FEED: &str = "feed";
pub const LINK_HR: &str = "hr";
/// At most this many overlapping skills are named in a match notification.
const MAX_NAMED_SKILLS: usize = 3;

pub async fn create_notification(
    pool: &PgPool,
    user_id: Uuid,
    title: &str,
    body: &str,
    link_page: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, title, body, link_page, read)
        VALUES ($1, $2, $3, $4, $5, FALSE)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(title)
    .bind(body)
    .bind(link_page)
    .execute(pool)
    .await?;
    Ok(())
}

/// Case-insensitive intersection of job tags and user skills, lowercased and sorted.
pub fn matching_skills(tags: &[String], skills: &[String]) -> Vec<String> {
    let tags: BTreeSet<String> = tags.iter().map(|t| t.to_lowercase()).collect();
    let skills: BTreeSet<String> = skills.iter().map(|s| s.to_lowercase()).collect();
    tags.intersection(&skills).cloned().collect()
}

pub fn job_match_message(job: &HrJobRow, overlap: &[String]) -> (String, String) {
    let named: Vec<&str> = overlap.iter().take(MAX_NAMED_SKILLS).map(String::as_str).collect();
    (
        format!("New job match: {}", job.title),
        format!(
            "{} posted a {} role matching your skills ({}).",
            job.company,
            job.title,
            named.join(", ")
        ),
    )
}

pub fn applicant_message(applicant_name: &str, job_title: &str, company: &str) -> (String, String) {
    (
        format!("New applicant: {applicant_name}"),
        format!(
            "{applicant_name} applied for your \"{job_title}\" role at {company}. \
             Check your Applications tab to review."
        ),
    )
}

/// Notifies every non-HR user whose skills overlap the job's tags.
/// Returns how many notifications were written.
pub async fn notify_matching_seekers(pool: &PgPool, job: &HrJobRow) -> Result<usize, sqlx::Error> {
    if job.tags.is_empty() {
        return Ok(0);
    }

    let seekers = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE role <> $1")
        .bind(UserRole::Hr.as_str())
        .fetch_all(pool)
        .await?;

    let mut sent = 0;
    for seeker in &seekers {
        let overlap = matching_skills(&job.tags, &seeker.skills);
        if overlap.is_empty() {
            continue;
        }
        let (title, body) = job_match_message(job, &overlap);
        create_notification(pool, seeker.id, &title, &body, LINK_FEED).await?;
        sent += 1;
    }

    if sent > 0 {
        info!("Notified {sent} seekers about job {}", job.id);
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn job(tags: &[&str]) -> HrJobRow {
        HrJobRow {
            id: "kanso-1a2b3c4d".to_string(),
            posted_by: Uuid::new_v4(),
            company: "Acme".to_string(),
            logo: String::new(),
            title: "Data Engineer".to_string(),
            location: String::new(),
            job_type: "Full-time".to_string(),
            salary: String::new(),
            summary: String::new(),
            description: String::new(),
            tags: strings(tags),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let overlap = matching_skills(&strings(&["Rust", "SQL", "Kafka"]), &strings(&["sql", "RUST", "Go"]));
        assert_eq!(overlap, vec!["rust", "sql"]);
    }

    #[test]
    fn test_no_overlap() {
        assert!(matching_skills(&strings(&["Rust"]), &strings(&["Python"])).is_empty());
        assert!(matching_skills(&[], &strings(&["Python"])).is_empty());
    }

    #[test]
    fn test_job_match_names_at_most_three_skills() {
        let overlap = strings(&["go", "kafka", "rust", "sql"]);
        let (title, body) = job_match_message(&job(&["Go", "Kafka", "Rust", "SQL"]), &overlap);
        assert_eq!(title, "New job match: Data Engineer");
        assert_eq!(
            body,
            "Acme posted a Data Engineer role matching your skills (go, kafka, rust)."
        );
    }

    #[test]
    fn test_applicant_message() {
        let (title, body) = applicant_message("Jane", "Data Engineer", "Acme");
        assert_eq!(title, "New applicant: Jane");
        assert_eq!(
            body,
            "Jane applied for your \"Data Engineer\" role at Acme. Check your Applications tab to review."
        );
    }
}
