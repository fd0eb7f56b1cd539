//! Post-interview feedback: one LLM call per request, stored as a record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::llm_client::prompts::{clip, JSON_ONLY_INSTRUCTION};
use crate::models::interview::InterviewFeedbackRow;

const TRANSCRIPT_LIMIT: usize = 3000;
const NOT_AVAILABLE: &str = "N/A";
const NO_TRANSCRIPT_SUMMARY: &str = "Interview completed. No transcript available for AI feedback.";
const FAILED_SUMMARY: &str = "Could not generate feedback.";

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

/// Models sometimes answer `"score": 7` instead of `"7/10"`.
fn score_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => not_available(),
        other => other.to_string(),
    })
}

/// The JSON object the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedbackReport {
    #[serde(default = "not_available", deserialize_with = "score_as_string")]
    pub score: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

impl FeedbackReport {
    fn with_summary(summary: &str) -> Self {
        Self {
            score: not_available(),
            summary: summary.to_string(),
            strengths: Vec::new(),
            improvements: Vec::new(),
        }
    }

    /// Stored when AI is disabled or nothing was said.
    pub fn no_transcript() -> Self {
        Self::with_summary(NO_TRANSCRIPT_SUMMARY)
    }

    /// Substituted when the model call or its JSON fails.
    pub fn failed() -> Self {
        Self::with_summary(FAILED_SUMMARY)
    }
}

pub fn build_feedback_prompt(job_title: &str, transcript: &str) -> String {
    format!(
        "You are an expert interview coach. Analyze this practice interview for a '{job_title}' role.\n\n\
         TRANSCRIPT:\n{}\n\n\
         Return ONLY a valid JSON object with these fields:\n\
         - \"score\" (string): Rating out of 10, e.g. \"7/10\"\n\
         - \"summary\" (string): 2-3 sentence overall assessment\n\
         - \"strengths\" (array of strings): 3-4 specific things the candidate did well\n\
         - \"improvements\" (array of strings): 3-4 specific areas to improve\n\
         {JSON_ONLY_INSTRUCTION}",
        clip(transcript, TRANSCRIPT_LIMIT)
    )
}

/// Stores one report alongside the transcript it was generated from.
pub async fn insert_feedback(
    pool: &PgPool,
    application_id: Uuid,
    user_id: Uuid,
    report: &FeedbackReport,
    transcript: &str,
    duration_seconds: i32,
) -> Result<InterviewFeedbackRow, sqlx::Error> {
    sqlx::query_as::<_, InterviewFeedbackRow>(
        r#"
        INSERT INTO interview_feedback
            (id, application_id, user_id, score, summary, strengths, improvements, transcript, duration_seconds)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(application_id)
    .bind(user_id)
    .bind(&report.score)
    .bind(&report.summary)
    .bind(&report.strengths)
    .bind(&report.improvements)
    .bind(transcript)
    .bind(duration_seconds)
    .fetch_one(pool)
    .await
}

/// Newest first.
pub async fn list_feedback(
    pool: &PgPool,
    application_id: Uuid,
) -> Result<Vec<InterviewFeedbackRow>, sqlx::Error> {
    sqlx::query_as::<_, InterviewFeedbackRow>(
        "SELECT * FROM interview_feedback WHERE application_id = $1 ORDER BY created_at DESC",
    )
    .bind(application_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_clips_transcript() {
        let prompt = build_feedback_prompt("SRE", &"t".repeat(5000));
        assert!(prompt.contains("a 'SRE' role"));
        assert!(prompt.contains(&"t".repeat(TRANSCRIPT_LIMIT)));
        assert!(!prompt.contains(&"t".repeat(TRANSCRIPT_LIMIT + 1)));
        assert!(prompt.ends_with(JSON_ONLY_INSTRUCTION));
    }

    #[test]
    fn test_report_parses_model_json() {
        let report: FeedbackReport = serde_json::from_str(
            r#"{"score":"7/10","summary":"Solid.","strengths":["clear"],"improvements":["depth"]}"#,
        )
        .unwrap();
        assert_eq!(report.score, "7/10");
        assert_eq!(report.strengths, vec!["clear"]);
    }

    #[test]
    fn test_report_defaults_and_numeric_score() {
        let report: FeedbackReport = serde_json::from_str(r#"{"score":8}"#).unwrap();
        assert_eq!(report.score, "8");
        assert!(report.summary.is_empty());

        let report: FeedbackReport = serde_json::from_str("{}").unwrap();
        assert_eq!(report.score, "N/A");
    }

    #[test]
    fn test_fallback_records() {
        assert_eq!(FeedbackReport::failed().summary, "Could not generate feedback.");
        assert_eq!(FeedbackReport::no_transcript().score, "N/A");
        assert!(FeedbackReport::no_transcript().strengths.is_empty());
    }
}
