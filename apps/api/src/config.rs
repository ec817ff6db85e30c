use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::matching::extractors::SkillMatchMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    Hash,
    Http,
}

impl FromStr for EmbedderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hash" => Ok(EmbedderKind::Hash),
            "http" => Ok(EmbedderKind::Http),
            other => Err(format!("unknown embedder '{other}'")),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub match_threshold: f64,
    pub recommendation_limit: usize,
    pub skill_match_mode: SkillMatchMode,
    pub embedder: EmbedderKind,
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub embedding_cache_size: usize,
    pub wabb_webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            match_threshold: parse_env("MATCH_THRESHOLD", 0.3)?,
            recommendation_limit: parse_env("RECOMMENDATION_LIMIT", 10)?,
            skill_match_mode: parse_env("SKILL_MATCH_MODE", SkillMatchMode::Substring)?,
            embedder: parse_env("EMBEDDER", EmbedderKind::Hash)?,
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            embedding_dimension: parse_env("EMBEDDING_DIMENSION", 256)?,
            embedding_cache_size: parse_env("EMBEDDING_CACHE_SIZE", 1024)?,
            wabb_webhook_url: optional_env("WABB_WEBHOOK_URL"),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.match_threshold) {
            bail!("MATCH_THRESHOLD must be in [0, 1), got {}", self.match_threshold);
        }
        if self.recommendation_limit == 0 {
            bail!("RECOMMENDATION_LIMIT must be at least 1");
        }
        if self.embedder == EmbedderKind::Http && self.embedding_api_url.is_none() {
            bail!("EMBEDDER=http requires EMBEDDING_API_URL");
        }
        Ok(())
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, std::env::var(key).ok(), default)
}

fn parse_value<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) if v.trim().is_empty() => Ok(default),
        Some(v) => v
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value '{v}': {e}")),
    }
}
