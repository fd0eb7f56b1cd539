//! Background résumé generation.
//!
//! Handlers claim an application (`status = 'processing'`) and hand a
//! [`ResumeJob`] to the queue. A single dispatcher task drains the channel
//! and runs each job on its own task, so the request returns immediately.
//!
//! Outcome per job:
//! - usable LaTeX: `tailored_resume` is written and status becomes `ready`
//! - LLM failure or empty output: status reverts to `saved`

use anyhow::anyhow;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError, LlmInput};
use crate::resume::prompts::{assemble_document, build_tailor_prompt};
use crate::resume::CandidateProfile;

const QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone)]
pub struct ResumeJob {
    pub application_id: Uuid,
    pub job_title: String,
    pub description: String,
    pub candidate: CandidateProfile,
}

#[derive(Clone)]
pub struct ResumeQueue {
    tx: mpsc::Sender<ResumeJob>,
}

impl ResumeQueue {
    /// Spawns the dispatcher. Must be called from inside a Tokio runtime.
    pub fn start(pool: PgPool, llm: LlmClient) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(dispatch(rx, pool, llm));
        Self { tx }
    }

    pub async fn enqueue(&self, job: ResumeJob) -> Result<(), AppError> {
        self.tx
            .send(job)
            .await
            .map_err(|_| AppError::Internal(anyhow!("Resume queue is closed")))
    }
}

async fn dispatch(mut rx: mpsc::Receiver<ResumeJob>, pool: PgPool, llm: LlmClient) {
    while let Some(job) = rx.recv().await {
        let pool = pool.clone();
        let llm = llm.clone();
        tokio::spawn(async move { process(&pool, &llm, job).await });
    }
    info!("Resume queue closed");
}

async fn process(pool: &PgPool, llm: &LlmClient, job: ResumeJob) {
    let id = job.application_id;
    let outcome = match generate_document(llm, &job).await {
        Ok(Some(latex)) => store_resume(pool, id, &latex).await,
        Ok(None) => {
            warn!("Résumé generation for {id} returned no content");
            revert_to_saved(pool, id).await
        }
        Err(e) => {
            error!("Résumé generation for {id} failed: {e}");
            revert_to_saved(pool, id).await
        }
    };
    if let Err(e) = outcome {
        error!("Failed to record résumé outcome for {id}: {e}");
    }
}

/// Asks the model for a tailored body and wraps it in the LaTeX template.
/// `Ok(None)` means the model answered but nothing usable remained.
pub async fn generate_document(
    llm: &LlmClient,
    job: &ResumeJob,
) -> Result<Option<String>, LlmError> {
    let prompt = build_tailor_prompt(&job.candidate, &job.job_title, &job.description);
    let raw = llm.invoke(LlmInput::Prompt(&prompt)).await?;
    Ok(assemble_document(&raw))
}

async fn store_resume(pool: &PgPool, id: Uuid, latex: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE applications SET tailored_resume = $2, status = 'ready' WHERE id = $1")
        .bind(id)
        .bind(latex)
        .execute(pool)
        .await?;
    info!("Résumé ready for application {id}");
    Ok(())
}

/// Puts a claimed application back so generation can be triggered again.
pub async fn revert_to_saved(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE applications SET status = 'saved' WHERE id = $1 AND status = 'processing'")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
