// Tailored résumés. Generation runs on a background queue; the stored
// LaTeX is compiled to PDF on request by an external pdflatex.
// All LLM calls go through llm_client; nothing here talks to Gemini directly.

pub mod prompts;
pub mod queue;
pub mod render;

use serde::{Deserialize, Serialize};

use crate::models::user::UserRow;

pub use queue::{ResumeJob, ResumeQueue};

/// The slice of a user profile that feeds the tailoring prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub headline: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub resume_text: String,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            name: "Your Name".to_string(),
            email: String::new(),
            phone: String::new(),
            location: String::new(),
            linkedin: String::new(),
            github: String::new(),
            headline: String::new(),
            skills: Vec::new(),
            experience: String::new(),
            education: String::new(),
            resume_text: String::new(),
        }
    }
}

impl From<&UserRow> for CandidateProfile {
    fn from(u: &UserRow) -> Self {
        Self {
            name: u.name.clone(),
            email: u.email.clone(),
            phone: u.phone.clone(),
            location: u.location.clone(),
            linkedin: u.linkedin.clone(),
            github: u.github.clone(),
            headline: u.headline.clone(),
            skills: u.skills.clone(),
            experience: u.experience.clone(),
            education: u.education.clone(),
            resume_text: u.resume_text.clone(),
        }
    }
}
