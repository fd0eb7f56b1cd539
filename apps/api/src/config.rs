use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a present variable is malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// `None` disables every AI-backed feature.
    pub google_api_key: Option<String>,
    pub port: u16,
    pub cors_origin: String,
    pub jobs_file: String,
    pub pdflatex_bin: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: std::env::var("DATABASE_URL").unwrap_or_else(|_| {
                database_url_from_parts(
                    &env_or("POSTGRES_USER", "user"),
                    &env_or("POSTGRES_PASSWORD", "password"),
                    &env_or("POSTGRES_DB", "recruiter_db"),
                )
            }),
            google_api_key: std::env::var("GOOGLE_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:3000"),
            jobs_file: env_or("JOBS_FILE", "data/jobs.json"),
            pdflatex_bin: env_or("PDFLATEX_BIN", "pdflatex"),
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Compose-style fallback: the database container is reachable as `db`.
fn database_url_from_parts(user: &str, password: &str, db: &str) -> String {
    format!("postgresql://{user}:{password}@db:5432/{db}")
}
