//! Director Service

use std::sync::Arc;

use super::validation;
use super::ServiceError;
use crate::domain::{DirectorRepository, MovieRepository};
use crate::models::{DirectorDto, MovieDto};

pub struct DirectorService {
    directors: Arc<dyn DirectorRepository>,
    movies: Arc<dyn MovieRepository>,
}

impl DirectorService {
    pub fn new(directors: Arc<dyn DirectorRepository>, movies: Arc<dyn MovieRepository>) -> Self {
        Self { directors, movies }
    }

    pub async fn get_all(&self) -> Result<Vec<DirectorDto>, ServiceError> {
        let directors = self.directors.find_all().await?;
        Ok(directors.into_iter().map(DirectorDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<DirectorDto, ServiceError> {
        validation::require_positive_id("id", id)?;
        self.directors
            .find_by_id(id)
            .await?
            .map(DirectorDto::from)
            .ok_or_else(|| ServiceError::not_found("Director", id))
    }

    pub async fn create(&self, dto: DirectorDto) -> Result<DirectorDto, ServiceError> {
        let dto = normalize(dto);
        validate(&dto)?;

        let director = self.directors.persist(dto.into_new()).await?;
        tracing::info!("Created director {} ({:?})", director.id, director.name);
        Ok(director.into())
    }

    pub async fn update(&self, dto: DirectorDto) -> Result<DirectorDto, ServiceError> {
        let id = dto
            .id
            .ok_or_else(|| ServiceError::BadRequest("id is required for update".to_string()))?;
        validation::require_positive_id("id", id)?;
        let dto = normalize(dto);
        validate(&dto)?;

        let director = self
            .directors
            .update(dto.into_entity(id))
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::NotFound(_) => ServiceError::not_found("Director", id),
                other => other,
            })?;
        Ok(director.into())
    }

    /// Refused while the director still has movies
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        validation::require_positive_id("id", id)?;
        let director = self
            .directors
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Director", id))?;
        if !director.movie_ids.is_empty() {
            tracing::warn!(
                "Refusing to delete director {} with {} movies",
                id,
                director.movie_ids.len()
            );
            return Err(ServiceError::Conflict(format!(
                "Director {:?} still has {} movies",
                director.name,
                director.movie_ids.len()
            )));
        }
        self.directors.delete(id).await?;
        tracing::info!("Deleted director {}", id);
        Ok(())
    }

    pub async fn search_by_name(&self, text: &str) -> Result<Vec<DirectorDto>, ServiceError> {
        validation::require_text("search text", text)?;
        let directors = self.directors.find_by_name_containing(text.trim()).await?;
        Ok(directors.into_iter().map(DirectorDto::from).collect())
    }

    pub async fn find_by_external_id(
        &self,
        external_id: i32,
    ) -> Result<Option<DirectorDto>, ServiceError> {
        validation::require_positive_id("external_id", external_id)?;
        Ok(self
            .directors
            .find_by_external_id(external_id)
            .await?
            .map(DirectorDto::from))
    }

    /// Movies directed, in id order
    pub async fn movies(&self, director_id: i32) -> Result<Vec<MovieDto>, ServiceError> {
        validation::require_positive_id("director_id", director_id)?;
        if self.directors.find_by_id(director_id).await?.is_none() {
            return Err(ServiceError::not_found("Director", director_id));
        }
        let movies = self.movies.find_by_director_id(director_id).await?;
        Ok(movies.into_iter().map(MovieDto::from).collect())
    }
}

/// A blank job is stored as absent
fn normalize(mut dto: DirectorDto) -> DirectorDto {
    dto.job = dto
        .job
        .map(|job| job.trim().to_string())
        .filter(|job| !job.is_empty());
    dto
}

fn validate(dto: &DirectorDto) -> Result<(), ServiceError> {
    validation::require_text("name", &dto.name)?;
    validation::validate_age(dto.age)?;
    if let Some(external_id) = dto.external_id {
        validation::require_positive_id("external_id", external_id)?;
    }
    Ok(())
}
