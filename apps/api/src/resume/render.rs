//! LaTeX → PDF via an external `pdflatex`.
//!
//! Compilation happens in a throwaway temp directory; two passes so
//! references settle. A missing PDF afterwards is reported with the tail of
//! the compiler log.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::Context;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::AppError;

const PASSES: usize = 2;
const PASS_TIMEOUT: Duration = Duration::from_secs(60);
/// Characters of compiler output kept in a render error.
pub const LOG_TAIL_CHARS: usize = 2000;

/// Anything without a `\documentclass` cannot be a standalone document.
pub fn is_latex_document(source: &str) -> bool {
    source.contains("\\documentclass")
}

/// The last `max_chars` characters of `text`.
pub fn tail(text: &str, max_chars: usize) -> &str {
    let total = text.chars().count();
    if total <= max_chars {
        return text;
    }
    match text.char_indices().nth(total - max_chars) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}

/// Compiles `latex` and returns the PDF bytes.
pub async fn compile_pdf(pdflatex_bin: &str, latex: &str) -> Result<Vec<u8>, AppError> {
    let dir = tempfile::tempdir().context("Failed to create render directory")?;
    let tex_path = dir.path().join("resume.tex");
    tokio::fs::write(&tex_path, latex)
        .await
        .context("Failed to write LaTeX source")?;

    let mut log = String::new();
    for pass in 1..=PASSES {
        match run_pass(pdflatex_bin, dir.path(), &tex_path).await {
            Ok(output) => log = output,
            Err(e) => {
                warn!("pdflatex pass {pass} did not complete: {e}");
                log = e;
                break;
            }
        }
    }

    match tokio::fs::read(dir.path().join("resume.pdf")).await {
        Ok(pdf) => {
            info!("Compiled résumé PDF ({} bytes)", pdf.len());
            Ok(pdf)
        }
        Err(_) => Err(AppError::Render {
            log: tail(&log, LOG_TAIL_CHARS).to_string(),
        }),
    }
}

/// One pdflatex invocation. Returns stdout; `Err` carries a description
/// when the process could not be run or timed out.
async fn run_pass(bin: &str, out_dir: &Path, tex_path: &Path) -> Result<String, String> {
    let child = Command::new(bin)
        .arg("-interaction=nonstopmode")
        .arg("-output-directory")
        .arg(out_dir)
        .arg(tex_path)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output();

    match tokio::time::timeout(PASS_TIMEOUT, child).await {
        Ok(Ok(output)) => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        Ok(Err(e)) => Err(format!("Failed to run {bin}: {e}")),
        Err(_) => Err(format!("{bin} timed out after {}s", PASS_TIMEOUT.as_secs())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_latex_document() {
        assert!(is_latex_document("\\documentclass{article}\n\\begin{document}x\\end{document}"));
        assert!(!is_latex_document("\\section{Education}"));
        assert!(!is_latex_document(""));
    }

    #[test]
    fn test_tail_keeps_last_chars() {
        assert_eq!(tail("abcdef", 3), "def");
        assert_eq!(tail("abc", 10), "abc");
        assert_eq!(tail("ééé", 2), "éé");
    }

    #[tokio::test]
    async fn test_missing_binary_is_render_error() {
        let err = compile_pdf("/nonexistent/pdflatex", "\\documentclass{article}")
            .await
            .unwrap_err();
        match err {
            AppError::Render { log } => assert!(log.contains("/nonexistent/pdflatex")),
            other => panic!("expected render error, got {other:?}"),
        }
    }
}
