use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Applies pending migrations from `migrations/` (schema + seed personalities).
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Applications left in `processing` with no résumé (e.g. the process died
/// mid-generation) go back to `saved` so they can be triggered again.
pub async fn reset_stuck_processing(pool: &PgPool) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE applications SET status = 'saved' \
         WHERE status = 'processing' AND (tailored_resume IS NULL OR tailored_resume = '')",
    )
    .execute(pool)
    .await?;

    let reset = result.rows_affected();
    if reset > 0 {
        info!("Reset {reset} stuck processing applications to saved");
    }
    Ok(reset)
}
