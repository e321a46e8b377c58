use std::env;

use thiserror::Error;

use crate::modules::integrations::tmdb::{DEFAULT_BASE_URL, MAX_DISCOVER_PAGES};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TMDB_API_KEY is not set")]
    MissingApiKey,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    /// Language of genre labels fetched from TMDB
    pub tmdb_language: String,
    /// Original language filter of the discovery listing
    pub sync_language: String,
    pub sync_max_pages: u32,
    pub http_timeout_secs: Option<u64>,
}

impl Config {
    /// Read `.env` if present, then the process environment
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://movie_catalog.db?mode=rwc".to_string()),
            tmdb_api_key: env::var("TMDB_API_KEY")
                .ok()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            tmdb_language: env::var("TMDB_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            sync_language: env::var("SYNC_LANGUAGE").unwrap_or_else(|_| "da".to_string()),
            sync_max_pages: env::var("SYNC_MAX_PAGES")
                .ok()
                .and_then(|p| p.parse::<u32>().ok())
                .unwrap_or(MAX_DISCOVER_PAGES)
                .clamp(1, MAX_DISCOVER_PAGES),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.tmdb_api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey)
    }
}
