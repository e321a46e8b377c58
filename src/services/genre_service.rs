//! Genre Service

use std::sync::Arc;

use super::validation;
use super::ServiceError;
use crate::domain::{GenreRepository, MovieRepository};
use crate::models::GenreDto;

pub struct GenreService {
    genres: Arc<dyn GenreRepository>,
    movies: Arc<dyn MovieRepository>,
}

impl GenreService {
    pub fn new(genres: Arc<dyn GenreRepository>, movies: Arc<dyn MovieRepository>) -> Self {
        Self { genres, movies }
    }

    pub async fn get_all(&self) -> Result<Vec<GenreDto>, ServiceError> {
        let genres = self.genres.find_all().await?;
        Ok(genres.into_iter().map(GenreDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<GenreDto, ServiceError> {
        validation::require_positive_id("id", id)?;
        self.genres
            .find_by_id(id)
            .await?
            .map(GenreDto::from)
            .ok_or_else(|| ServiceError::not_found("Genre", id))
    }

    /// Refuses a name or external id that is already catalogued
    pub async fn create(&self, dto: GenreDto) -> Result<GenreDto, ServiceError> {
        validate(&dto)?;
        if self.genres.find_by_name(dto.name.trim()).await?.is_some() {
            return Err(ServiceError::AlreadyExists(format!(
                "Genre {:?} already exists",
                dto.name.trim()
            )));
        }
        self.import(dto).await
    }

    /// Create without the name check. Synchronized taxonomies may carry
    /// several entries under the same placeholder name.
    pub async fn import(&self, dto: GenreDto) -> Result<GenreDto, ServiceError> {
        validate(&dto)?;
        if let Some(external_id) = dto.external_id
            && self.genres.find_by_external_id(external_id).await?.is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Genre with external id {} already exists",
                external_id
            )));
        }

        let genre = self.genres.persist(dto.into_new()).await?;
        tracing::info!("Created genre {} ({:?})", genre.id, genre.name);
        Ok(genre.into())
    }

    pub async fn update(&self, dto: GenreDto) -> Result<GenreDto, ServiceError> {
        let id = dto
            .id
            .ok_or_else(|| ServiceError::BadRequest("id is required for update".to_string()))?;
        validation::require_positive_id("id", id)?;
        validate(&dto)?;
        if let Some(external_id) = dto.external_id
            && let Some(other) = self.genres.find_by_external_id(external_id).await?
            && other.id != id
        {
            return Err(ServiceError::Conflict(format!(
                "External id {} belongs to genre {}",
                external_id, other.id
            )));
        }

        let genre = self
            .genres
            .update(dto.into_entity(id))
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::NotFound(_) => ServiceError::not_found("Genre", id),
                other => other,
            })?;
        Ok(genre.into())
    }

    /// Refused while any movie is still filed under the genre
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        validation::require_positive_id("id", id)?;
        let genre = self
            .genres
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Genre", id))?;
        if !genre.movie_ids.is_empty() {
            tracing::warn!(
                "Refusing to delete genre {} still used by {} movies",
                id,
                genre.movie_ids.len()
            );
            return Err(ServiceError::Conflict(format!(
                "Genre {:?} is used by {} movies",
                genre.name,
                genre.movie_ids.len()
            )));
        }
        self.genres.delete(id).await?;
        tracing::info!("Deleted genre {}", id);
        Ok(())
    }

    pub async fn find_by_name(&self, name: &str) -> Result<GenreDto, ServiceError> {
        validation::require_text("name", name)?;
        self.genres
            .find_by_name(name.trim())
            .await?
            .map(GenreDto::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Genre {:?} not found", name.trim())))
    }

    pub async fn find_by_external_id(
        &self,
        external_id: i32,
    ) -> Result<Option<GenreDto>, ServiceError> {
        validation::require_positive_id("external_id", external_id)?;
        Ok(self
            .genres
            .find_by_external_id(external_id)
            .await?
            .map(GenreDto::from))
    }

    /// Case-insensitive substring search
    pub async fn search_by_name(&self, text: &str) -> Result<Vec<GenreDto>, ServiceError> {
        validation::require_text("search text", text)?;
        let genres = self.genres.find_by_name_containing(text.trim()).await?;
        Ok(genres.into_iter().map(GenreDto::from).collect())
    }

    /// Titles of the movies filed under the genre, in id order
    pub async fn movie_titles(&self, genre_id: i32) -> Result<Vec<String>, ServiceError> {
        validation::require_positive_id("genre_id", genre_id)?;
        if self.genres.find_by_id(genre_id).await?.is_none() {
            return Err(ServiceError::not_found("Genre", genre_id));
        }
        let movies = self.movies.find_by_genre_id(genre_id).await?;
        Ok(movies.into_iter().map(|m| m.title).collect())
    }
}

fn validate(dto: &GenreDto) -> Result<(), ServiceError> {
    validation::require_text("name", &dto.name)?;
    if let Some(external_id) = dto.external_id {
        validation::require_positive_id("external_id", external_id)?;
    }
    Ok(())
}
