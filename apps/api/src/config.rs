use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::extract::{DEFAULT_MAX_CONTENT_CHARS, DEFAULT_MAX_FILE_BYTES};
use crate::llm_client::{LlmSettings, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_base_url: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub candidates_path: PathBuf,
    pub jobs_path: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub max_content_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            llm_model: std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            llm_temperature: parse_env("LLM_TEMPERATURE", 0.7)?,
            llm_base_url: std::env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60)?,
            llm_max_retries: parse_env("LLM_MAX_RETRIES", 3)?,
            candidates_path: path_env("CANDIDATES_PATH", "candidates.json"),
            jobs_path: path_env("JOBS_PATH", "jobs.csv"),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir().join("screener-uploads")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_FILE_BYTES)?,
            max_content_chars: parse_env("MAX_CONTENT_CHARS", DEFAULT_MAX_CONTENT_CHARS)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            base_url: self.llm_base_url.clone(),
            model: self.llm_model.clone(),
            temperature: self.llm_temperature,
            timeout: Duration::from_secs(self.llm_timeout_secs),
            max_retries: self.llm_max_retries,
            ..LlmSettings::new(self.groq_api_key.clone())
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn path_env(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

#[cfg(test)]
impl Config {
    /// Configuration rooted in a scratch directory, with no network settings.
    pub fn for_tests(root: &std::path::Path) -> Self {
        Config {
            groq_api_key: "test-key".to_string(),
            llm_model: DEFAULT_MODEL.to_string(),
            llm_temperature: 0.0,
            llm_base_url: "http://127.0.0.1:9".to_string(),
            llm_timeout_secs: 1,
            llm_max_retries: 1,
            candidates_path: root.join("candidates.json"),
            jobs_path: root.join("jobs.csv"),
            upload_dir: root.join("uploads"),
            max_upload_bytes: DEFAULT_MAX_FILE_BYTES,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}
