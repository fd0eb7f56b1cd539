// System prompts for the AI-HR chat.

use crate::llm_client::prompts::clip;
use crate::models::chat::HrPersonalityRow;

pub const DEFAULT_HR_NAME: &str = "KansoAI Recruiter";
pub const FALLBACK_REPLY: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";
const DESCRIPTION_LIMIT: usize = 800;

pub fn build_chat_system_prompt(
    personality: Option<&HrPersonalityRow>,
    company: &str,
    job_title: &str,
    description: &str,
) -> String {
    let description = clip(description, DESCRIPTION_LIMIT);
    match personality {
        Some(p) => format!(
            "{style}\n\n\
             You are conducting an informational / pre-interview chat with a candidate \
             who applied for the '{job_title}' role at {company}.\n\
             Job description:\n{description}\n\n\
             Keep answers concise (under 150 words). Stay in character at all times.",
            style = p.style,
        ),
        None => {
            let company = if company.is_empty() { "the hiring company" } else { company };
            format!(
                "You are a helpful AI recruiter representing {company}. \
                 The candidate applied for '{job_title}'.\n\
                 Job description:\n{description}\n\n\
                 Be professional, warm, and concise (under 150 words). \
                 Answer questions about the role, share interview tips, and ask follow-up questions."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn personality() -> HrPersonalityRow {
        HrPersonalityRow {
            id: "hr-google".to_string(),
            company: "Google".to_string(),
            hr_name: "Sarah Chen".to_string(),
            style: "You are Sarah Chen, a recruiter at Google.".to_string(),
            common_questions: Vec::new(),
            tone: "friendly".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_persona_prompt_starts_with_style() {
        let prompt = build_chat_system_prompt(Some(&personality()), "Google", "SRE", "Keep it up");
        assert!(prompt.starts_with("You are Sarah Chen"));
        assert!(prompt.contains("'SRE' role at Google"));
        assert!(prompt.contains("Stay in character"));
    }

    #[test]
    fn test_generic_prompt_without_company() {
        let prompt = build_chat_system_prompt(None, "", "SRE", "");
        assert!(prompt.starts_with("You are a helpful AI recruiter representing the hiring company."));
        assert!(prompt.contains("under 150 words"));
    }

    #[test]
    fn test_description_is_clipped() {
        let prompt = build_chat_system_prompt(None, "Acme", "SRE", &"x".repeat(2000));
        assert!(prompt.contains(&"x".repeat(800)));
        assert!(!prompt.contains(&"x".repeat(801)));
    }
}
