use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

const DEFAULT_SESSION_FILE: &str = "data/session.json";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where the session keys live between restarts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    File(PathBuf),
    Redis(String),
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; a missing Gemini key leaves the AI features unconfigured.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_api_url: String,
    pub llm_timeout: Duration,
    pub session_backend: SessionBackend,
    pub listing_latency: Duration,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let session_backend = match var("SESSION_STORE").as_deref().unwrap_or("file") {
            "memory" => SessionBackend::Memory,
            "file" => SessionBackend::File(
                var("SESSION_FILE")
                    .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string())
                    .into(),
            ),
            "redis" => SessionBackend::Redis(
                var("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string()),
            ),
            other => bail!("SESSION_STORE must be one of memory, file, redis (got '{other}')"),
        };

        Ok(Config {
            gemini_api_key: var("GEMINI_API_KEY").or_else(|| var("API_KEY")),
            gemini_model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_api_url: var("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            llm_timeout: Duration::from_secs(
                parse_or(var("LLM_TIMEOUT_SECS"), 120, "LLM_TIMEOUT_SECS")?,
            ),
            session_backend,
            listing_latency: Duration::from_millis(
                parse_or(var("LISTING_LATENCY_MS"), 500, "LISTING_LATENCY_MS")?,
            ),
            max_upload_bytes: parse_or(
                var("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
                "MAX_UPLOAD_BYTES",
            )?,
            port: parse_or(var("PORT"), 8080, "PORT")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(value: Option<String>, default: T, key: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got '{v}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.gemini_api_key, None);
        assert_eq!(cfg.gemini_model, DEFAULT_MODEL);
        assert_eq!(cfg.llm_timeout, Duration::from_secs(120));
        assert_eq!(cfg.listing_latency, Duration::from_millis(500));
        assert_eq!(cfg.port, 8080);
        assert_eq!(
            cfg.session_backend,
            SessionBackend::File(PathBuf::from(DEFAULT_SESSION_FILE))
        );
    }

    #[test]
    fn test_api_key_fallback_and_empty_values() {
        let cfg = config(&[("GEMINI_API_KEY", ""), ("API_KEY", "k2")]).unwrap();
        assert_eq!(cfg.gemini_api_key.as_deref(), Some("k2"));

        let cfg = config(&[("GEMINI_API_KEY", "k1"), ("API_KEY", "k2")]).unwrap();
        assert_eq!(cfg.gemini_api_key.as_deref(), Some("k1"));
    }

    #[test]
    fn test_session_backends() {
        assert_eq!(
            config(&[("SESSION_STORE", "memory")]).unwrap().session_backend,
            SessionBackend::Memory
        );
        assert_eq!(
            config(&[("SESSION_STORE", "redis"), ("REDIS_URL", "redis://cache/")])
                .unwrap()
                .session_backend,
            SessionBackend::Redis("redis://cache/".into())
        );
        assert!(config(&[("SESSION_STORE", "sqlite")]).is_err());
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
        assert!(config(&[("LISTING_LATENCY_MS", "-1")]).is_err());
    }
}
