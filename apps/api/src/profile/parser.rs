//! Résumé text segmenter: turns raw extracted CV text into profile fields.
//!
//! Pure and deterministic: no I/O, never fails. Unrecognised layouts produce
//! empty fields rather than errors.
//!
//! Known limitations (kept as-is, callers must tolerate them):
//! - The second non-empty line is assumed to be the headline (first = name).
//! - Text before the first recognised heading lands in a `header` bucket that
//!   is never surfaced, so a CV with no headings yields only a headline.
//! - Only lines shorter than 60 characters can be headings.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lines at or above this length are never treated as headings.
const MAX_HEADING_CHARS: usize = 60;
/// Skill fragments at or above this length are dropped.
const MAX_SKILL_CHARS: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub headline: String,
    pub bio: String,
    pub skills: Vec<String>,
    pub experience: String,
    pub education: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
}

impl Section {
    const COUNT: usize = 5;

    fn index(self) -> usize {
        self as usize
    }
}

/// Heading patterns, tested in order; the first match wins.
fn heading_patterns() -> &'static [(Section, Regex)] {
    static PATTERNS: OnceLock<Vec<(Section, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                Section::Summary,
                r"(?i)^(summary|about|profile|objective|professional\s*summary)",
            ),
            (
                Section::Experience,
                r"(?i)^(experience|work\s*history|employment|professional\s*experience)",
            ),
            (
                Section::Education,
                r"(?i)^(education|academic|degrees|certifications?|qualifications?)",
            ),
            (
                Section::Skills,
                r"(?i)^(skills|technologies|technical\s*skills|competencies|expertise|tools)",
            ),
        ]
        .into_iter()
        .map(|(section, pattern)| (section, Regex::new(pattern).expect("valid heading regex")))
        .collect()
    })
}

fn skill_delimiters() -> &'static Regex {
    static DELIMITERS: OnceLock<Regex> = OnceLock::new();
    DELIMITERS.get_or_init(|| Regex::new(r"[,•·|;\n]+").expect("valid delimiter regex"))
}

fn detect_heading(line: &str) -> Option<Section> {
    if line.chars().count() >= MAX_HEADING_CHARS {
        return None;
    }
    heading_patterns()
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(section, _)| *section)
}

/// Splits a skills block on commas, bullets, pipes, semicolons and newlines.
pub fn split_skills(block: &str) -> Vec<String> {
    skill_delimiters()
        .split(block)
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.chars().count() < MAX_SKILL_CHARS)
        .map(String::from)
        .collect()
}

/// Segments raw résumé text into headline, bio, skills, experience and education.
pub fn parse_resume_text(raw: &str) -> ResumeSections {
    let mut result = ResumeSections::default();
    let lines: Vec<&str> = raw.trim().split('\n').map(str::trim).collect();

    if let Some(headline) = lines.iter().filter(|l| !l.is_empty()).nth(1) {
        result.headline = headline.to_string();
    }

    let mut buckets: [Vec<&str>; Section::COUNT] = Default::default();
    let mut current = Section::Header;
    for line in lines.iter().copied() {
        match detect_heading(line) {
            Some(section) => current = section,
            None => buckets[current.index()].push(line),
        }
    }

    let text = |section: Section| buckets[section.index()].join("\n").trim().to_string();

    result.bio = text(Section::Summary);
    result.experience = text(Section::Experience);
    result.education = text(Section::Education);
    let skills = text(Section::Skills);
    if !skills.is_empty() {
        result.skills = split_skills(&skills);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(heading_patterns().len(), 4);
        assert_eq!(skill_delimiters().split("a;b").count(), 2);
    }

    const SAMPLE_CV: &str = "\
Jane Doe
Senior Engineer
jane@example.com

Summary
Backend engineer with 8 years building payment systems.

Experience
Acme Corp — Staff Engineer (2019–2024)
Led the ledger rewrite.

Education
BSc Computer Science, MIT

Skills
Python, Go; Rust|C++
• Kubernetes
";

    #[test]
    fn test_headline_is_second_non_empty_line() {
        let parsed = parse_resume_text("Jane Doe\nSenior Engineer\n...");
        assert_eq!(parsed.headline, "Senior Engineer");
    }

    #[test]
    fn test_headline_skips_blank_lines() {
        let parsed = parse_resume_text("\n\nJane Doe\n\n   \nStaff Engineer\n");
        assert_eq!(parsed.headline, "Staff Engineer");
    }

    #[test]
    fn test_single_line_has_no_headline() {
        assert_eq!(parse_resume_text("Jane Doe").headline, "");
    }

    #[test]
    fn test_full_cv_is_segmented() {
        let parsed = parse_resume_text(SAMPLE_CV);
        assert_eq!(parsed.headline, "Senior Engineer");
        assert_eq!(parsed.bio, "Backend engineer with 8 years building payment systems.");
        assert_eq!(
            parsed.experience,
            "Acme Corp — Staff Engineer (2019–2024)\nLed the ledger rewrite."
        );
        assert_eq!(parsed.education, "BSc Computer Science, MIT");
        assert_eq!(parsed.skills, vec!["Python", "Go", "Rust", "C++", "Kubernetes"]);
    }

    #[test]
    fn test_skills_split_on_delimiter_set_in_order() {
        assert_eq!(split_skills("Python, Go; Rust|C++"), vec!["Python", "Go", "Rust", "C++"]);
    }

    #[test]
    fn test_skills_drop_long_fragments_and_keep_duplicates() {
        let long = "a".repeat(50);
        let block = format!("Rust, {long}, Rust · SQL");
        assert_eq!(split_skills(&block), vec!["Rust", "Rust", "SQL"]);
        assert_eq!(split_skills(&"b".repeat(49)).len(), 1);
    }

    #[test]
    fn test_no_headings_leaves_everything_but_headline_empty() {
        let parsed = parse_resume_text("Jane Doe\nEngineer\nBuilt things\nShipped stuff");
        assert_eq!(parsed.headline, "Engineer");
        assert!(parsed.bio.is_empty());
        assert!(parsed.experience.is_empty());
        assert!(parsed.education.is_empty());
        assert!(parsed.skills.is_empty());
    }

    #[test]
    fn test_long_line_with_keyword_is_not_a_heading() {
        let text = "Jane Doe\nEngineer\nSummary\n\
            Experience with large-scale distributed systems and payment infrastructure\n\
            Still the summary";
        let parsed = parse_resume_text(text);
        assert!(parsed.experience.is_empty());
        assert!(parsed.bio.starts_with("Experience with large-scale"));
        assert!(parsed.bio.ends_with("Still the summary"));
    }

    #[test]
    fn test_short_line_starting_with_keyword_is_a_heading() {
        let parsed = parse_resume_text("A\nB\nWORK HISTORY\nAcme\nTechnical Skills\nRust");
        assert_eq!(parsed.experience, "Acme");
        assert_eq!(parsed.skills, vec!["Rust"]);
    }

    #[test]
    fn test_certifications_map_to_education() {
        let parsed = parse_resume_text("A\nB\nCertification\nAWS Solutions Architect");
        assert_eq!(parsed.education, "AWS Solutions Architect");
    }

    #[test]
    fn test_professional_summary_heading() {
        let parsed = parse_resume_text("A\nB\nProfessional Summary\nI build things.");
        assert_eq!(parsed.bio, "I build things.");
    }

    #[test]
    fn test_repeated_heading_appends_to_same_section() {
        let parsed = parse_resume_text("A\nB\nSkills\nRust\nEducation\nMIT\nTools\nGit");
        assert_eq!(parsed.skills, vec!["Rust", "Git"]);
        assert_eq!(parsed.education, "MIT");
    }

    #[test]
    fn test_empty_and_garbage_input_never_fail() {
        assert_eq!(parse_resume_text(""), ResumeSections::default());
        let parsed = parse_resume_text("\u{0}\u{7f}••••\n|||;;;\n");
        assert!(parsed.skills.is_empty());
    }

    #[test]
    fn test_parsing_is_idempotent() {
        assert_eq!(parse_resume_text(SAMPLE_CV), parse_resume_text(SAMPLE_CV));
    }

    #[test]
    fn test_windows_line_endings_are_trimmed() {
        let parsed = parse_resume_text("Jane\r\nEngineer\r\nSkills\r\nRust, Go\r\n");
        assert_eq!(parsed.headline, "Engineer");
        assert_eq!(parsed.skills, vec!["Rust", "Go"]);
    }
}
