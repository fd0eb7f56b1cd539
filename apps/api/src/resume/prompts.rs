// LLM prompt and LaTeX template for résumé tailoring.

use std::fmt::Write;

use crate::llm_client::prompts::{clip, clip_or};
use crate::llm_client::strip_code_fences;
use crate::resume::CandidateProfile;

pub const CONTENT_PLACEHOLDER: &str = "%% CONTENT_PLACEHOLDER";

/// Jake Ryan résumé preamble. The model only writes the document body.
pub const LATEX_TEMPLATE: &str = r#"
\documentclass[letterpaper,11pt]{article}
\usepackage{latexsym}
\usepackage[empty]{fullpage}
\usepackage{titlesec}
\usepackage{marvosym}
\usepackage[usenames,dvipsnames]{color}
\usepackage{verbatim}
\usepackage{enumitem}
\usepackage[hidelinks]{hyperref}
\usepackage{fancyhdr}
\usepackage[english]{babel}
\usepackage{tabularx}
\input{glyphtounicode}
\pagestyle{fancy}
\fancyhf{}
\fancyfoot{}
\renewcommand{\headrulewidth}{0pt}
\renewcommand{\footrulewidth}{0pt}
\addtolength{\oddsidemargin}{-0.5in}
\addtolength{\evensidemargin}{-0.5in}
\addtolength{\textwidth}{1in}
\addtolength{\topmargin}{-.5in}
\addtolength{\textheight}{1.0in}
\urlstyle{same}
\raggedbottom
\raggedright
\setlength{\tabcolsep}{0in}
\titleformat{\section}{\vspace{-4pt}\scshape\raggedright\large}{}{0em}{}[\color{black}\titlerule \vspace{-5pt}]
\pdfgentounicode=1
\newcommand{\resumeItem}[1]{\item\small{{#1 \vspace{-2pt}}}}
\newcommand{\resumeSubheading}[4]{\vspace{-2pt}\item\begin{tabular*}{0.97\textwidth}[t]{l@{\extracolsep{\fill}}r}\textbf{#1} & #2 \\\textit{\small#3} & \textit{\small #4} \\\end{tabular*}\vspace{-7pt}}
\newcommand{\resumeProjectHeading}[2]{\item\begin{tabular*}{0.97\textwidth}{l@{\extracolsep{\fill}}r}\small#1 & #2 \\\end{tabular*}\vspace{-7pt}}
\newcommand{\resumeSubItem}[1]{\resumeItem{#1}\vspace{-4pt}}
\renewcommand\labelitemii{$\vcenter{\hbox{\tiny$\bullet$}}$}
\newcommand{\resumeSubHeadingListStart}{\begin{itemize}[leftmargin=0.15in, label={}]}
\newcommand{\resumeSubHeadingListEnd}{\end{itemize}}
\newcommand{\resumeItemListStart}{\begin{itemize}}
\newcommand{\resumeItemListEnd}{\end{itemize}\vspace{-5pt}}
\begin{document}
%% CONTENT_PLACEHOLDER
\end{document}
"#;

const TAILOR_PREAMBLE: &str = r#"You are an expert resume writer. You MUST output ONLY the LaTeX body content (everything between \begin{document} and \end{document}) for a professional resume using the Jake Ryan LaTeX template commands provided below.

AVAILABLE COMMANDS:
- \resumeSubheading{Title}{Dates}{Subtitle}{Location}
- \resumeItem{Description text}
- \resumeProjectHeading{\textbf{Name} $|$ \emph{Tech stack}}{Dates}
- \resumeSubHeadingListStart / \resumeSubHeadingListEnd
- \resumeItemListStart / \resumeItemListEnd
- \section{Section Name}
"#;

const TAILOR_INSTRUCTIONS: &str = r#"INSTRUCTIONS:
1. Start with a centered heading block: name, phone, email, linkedin, github.
2. Include sections: Education, Experience, Projects (if relevant), Technical Skills.
3. TAILOR bullet points to emphasize skills/experience relevant to the job.
4. Use strong action verbs and quantify achievements where possible.
5. Keep it to ONE page of content.
6. Escape special LaTeX characters: & → \&, % → \%, # → \#, $ (in text) → \$.
7. Return ONLY the LaTeX body content (no \documentclass, no preamble, no \begin{document}/\end{document}). Start directly with \begin{center}.
8. Do NOT wrap in markdown code fences."#;

const NOT_SPECIFIED: &str = "Not specified";

/// Builds the tailoring prompt for one candidate and one job.
pub fn build_tailor_prompt(candidate: &CandidateProfile, job_title: &str, description: &str) -> String {
    let skills = if candidate.skills.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        candidate.skills.join(", ")
    };

    let mut prompt = String::from(TAILOR_PREAMBLE);
    // Writing into a String cannot fail.
    let _ = write!(
        prompt,
        "\nCANDIDATE INFO:\n\
         - Name: {}\n\
         - Email: {}\n\
         - Phone: {}\n\
         - Location: {}\n\
         - LinkedIn: {}\n\
         - GitHub: {}\n\
         - Skills: {}\n\
         - Education: {}\n\
         - Experience: {}\n",
        candidate.name,
        candidate.email,
        candidate.phone,
        candidate.location,
        candidate.linkedin,
        candidate.github,
        skills,
        clip_or(&candidate.education, 800, NOT_SPECIFIED),
        clip_or(&candidate.experience, 1200, NOT_SPECIFIED),
    );
    if !candidate.resume_text.is_empty() {
        let _ = writeln!(prompt, "- Existing Resume Text: {}", clip(&candidate.resume_text, 1500));
    }
    let _ = write!(
        prompt,
        "\nTARGET JOB: {job_title}\nJOB DESCRIPTION:\n{}\n\n{TAILOR_INSTRUCTIONS}",
        clip(description, 2000)
    );
    prompt
}

/// Cleans model output down to a bare LaTeX body.
pub fn sanitize_body(raw: &str) -> String {
    strip_code_fences(raw)
        .replace("\\begin{document}", "")
        .replace("\\end{document}", "")
        .trim()
        .to_string()
}

/// Wraps the model's body in the template; `None` when nothing usable came back.
pub fn assemble_document(raw: &str) -> Option<String> {
    let body = sanitize_body(raw);
    if body.is_empty() {
        return None;
    }
    Some(LATEX_TEMPLATE.replace(CONTENT_PLACEHOLDER, &body))
}
