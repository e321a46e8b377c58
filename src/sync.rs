//! TMDB to catalog synchronization

use chrono::{Months, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::infrastructure::config::Config;
use crate::modules::integrations::tmdb::{MAX_DISCOVER_PAGES, TmdbError};
use crate::services::ServiceError;

pub mod importer;

pub use importer::MovieSync;

/// Cast members imported per movie unless configured otherwise
pub const DEFAULT_MAX_CAST: usize = 10;

/// Label for genre ids missing from the taxonomy
pub const UNKNOWN_GENRE: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub struct SyncOptions {
    /// `with_original_language` filter
    pub language: String,
    /// Language of genre labels
    pub genre_language: String,
    pub release_from: Option<NaiveDate>,
    pub release_to: Option<NaiveDate>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
    pub max_pages: u32,
    /// Overwrite language, rating, external id and genres of known movies
    pub update_existing: bool,
    /// Fetch credits for every imported or updated movie
    pub with_credits: bool,
    pub max_cast: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            language: "da".to_string(),
            genre_language: "en".to_string(),
            release_from: None,
            release_to: None,
            min_rating: None,
            max_rating: None,
            max_pages: MAX_DISCOVER_PAGES,
            update_existing: false,
            with_credits: false,
            max_cast: DEFAULT_MAX_CAST,
        }
    }
}

impl SyncOptions {
    /// The last five years up to `today`, in the configured language
    pub fn from_config(config: &Config, today: NaiveDate) -> Self {
        Self {
            language: config.sync_language.clone(),
            genre_language: config.tmdb_language.clone(),
            release_from: Some(today.checked_sub_months(Months::new(60)).unwrap_or(today)),
            release_to: Some(today),
            max_pages: config.sync_max_pages,
            ..Default::default()
        }
    }

    /// Pages to walk given the `total_pages` of the first listing
    pub fn page_limit(&self, total_pages: Option<i64>) -> u32 {
        let cap = self.max_pages.clamp(1, MAX_DISCOVER_PAGES);
        match total_pages {
            Some(total) if total > 0 => total.min(i64::from(cap)) as u32,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub pages: u32,
    pub imported: u32,
    pub updated: u32,
    pub skipped: u32,
    pub genres_created: u32,
    pub actors_created: u32,
    pub directors_created: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenreRefresh {
    pub created: u32,
    pub renamed: u32,
    pub unchanged: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActorImport {
    pub pages: u32,
    pub created: u32,
    pub known: u32,
    /// Not known for acting, or rejected by validation
    pub skipped: u32,
}

/// Cause of a failed page
#[derive(Debug, Error)]
pub enum SyncFailure {
    #[error(transparent)]
    Tmdb(#[from] TmdbError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("TMDB_API_KEY is not set")]
    MissingApiKey,
    #[error("TMDB client could not be built: {0}")]
    Client(TmdbError),
    #[error("Failed to fetch genre list: {0}")]
    Genres(TmdbError),
    #[error("Sync failed on page {page}: {source}")]
    Page { page: u32, source: SyncFailure },
    #[error("Catalog update failed: {0}")]
    Catalog(#[from] ServiceError),
}

impl SyncError {
    pub(crate) fn page(page: u32, source: impl Into<SyncFailure>) -> Self {
        SyncError::Page {
            page,
            source: source.into(),
        }
    }
}
