use std::path::PathBuf;

use anyhow::{bail, Context, Result};

/// Where uploaded résumé binaries are kept.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeStorage {
    Local { upload_dir: PathBuf },
    S3(S3Settings),
}

#[derive(Debug, Clone, PartialEq)]
pub struct S3Settings {
    pub bucket: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub anthropic_api_key: String,
    pub jwt_secret: String,
    pub resume_storage: ResumeStorage,
    pub cors_allow_localhost: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            jwt_secret: require_env("JWT_SECRET")?,
            resume_storage: resume_storage_from_env()?,
            cors_allow_localhost: std::env::var("CORS_ALLOW_LOCALHOST")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn resume_storage_from_env() -> Result<ResumeStorage> {
    let backend = std::env::var("RESUME_STORAGE").unwrap_or_else(|_| "local".to_string());
    match backend.trim().to_ascii_lowercase().as_str() {
        "local" => Ok(ResumeStorage::Local {
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads/resumes")),
        }),
        "s3" => Ok(ResumeStorage::S3(S3Settings {
            bucket: require_env("S3_BUCKET")?,
            endpoint: require_env("S3_ENDPOINT")?,
            access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
            secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
        })),
        other => bail!("RESUME_STORAGE must be 'local' or 's3', got '{other}'"),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
