use chrono::NaiveDate;
use reqwest::Client;

use super::models::{DiscoverMovie, GenreList, MovieCredits, PaginatedResponse, Person};
use super::{Result, TmdbError};
use crate::infrastructure::config::{Config, ConfigError};

/// Filters for `/discover/movie`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverQuery {
    pub page: u32,
    pub original_language: Option<String>,
    pub release_from: Option<NaiveDate>,
    pub release_to: Option<NaiveDate>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl DiscoverQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.max(1).to_string())];
        if let Some(language) = &self.original_language {
            params.push(("with_original_language", language.clone()));
        }
        if let Some(from) = self.release_from {
            params.push(("primary_release_date.gte", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.release_to {
            params.push(("primary_release_date.lte", to.format("%Y-%m-%d").to_string()));
        }
        if let Some(min) = self.min_rating {
            params.push(("vote_average.gte", min.to_string()));
        }
        if let Some(max) = self.max_rating {
            params.push(("vote_average.lte", max.to_string()));
        }
        params
    }
}

pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    /// Create a TmdbClient with a reqwest Client.
    pub fn new(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from configuration. Fails without an API key.
    pub fn from_config(config: &Config) -> std::result::Result<Self, FromConfigError> {
        let api_key = config.require_api_key()?;

        let mut builder = Client::builder();
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| FromConfigError::Tmdb(TmdbError::HttpClient(e.to_string())))?;

        Ok(Self::new(client, api_key, config.tmdb_base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /genre/movie/list`
    pub async fn movie_genres(&self, language: &str) -> Result<GenreList> {
        let response = self
            .client
            .get(self.url("/genre/movie/list"))
            .query(&[("api_key", self.api_key.as_str()), ("language", language)])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// `GET /discover/movie`
    pub async fn discover_movies(
        &self,
        query: &DiscoverQuery,
    ) -> Result<PaginatedResponse<DiscoverMovie>> {
        tracing::debug!("TMDB discover page {}", query.page);
        let response = self
            .client
            .get(self.url("/discover/movie"))
            .query(&[("api_key", self.api_key.as_str())])
            .query(&query.params())
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// `GET /movie/{id}/credits`
    pub async fn movie_credits(&self, movie_id: i32) -> Result<MovieCredits> {
        let response = self
            .client
            .get(self.url(&format!("/movie/{}/credits", movie_id)))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// `GET /person/popular`
    pub async fn popular_people(&self, page: u32) -> Result<PaginatedResponse<Person>> {
        let response = self
            .client
            .get(self.url("/person/popular"))
            .query(&[("api_key", self.api_key.as_str())])
            .query(&[("page", page.max(1).to_string())])
            .send()
            .await?;
        self.handle_response(response).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TmdbError::Api {
                status_code: status.as_u16(),
                message: body,
            });
        }
        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|e| TmdbError::Json {
            path: e.path().to_string(),
            source: e.into_inner(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FromConfigError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tmdb(#[from] TmdbError),
}
