//! Movie Service - validation and orchestration over the movie repository

use std::sync::Arc;

use chrono::NaiveDate;

use super::validation;
use super::ServiceError;
use crate::domain::{ActorRepository, DirectorRepository, GenreRepository, MovieRepository};
use crate::models::MovieDto;

pub struct MovieService {
    movies: Arc<dyn MovieRepository>,
    genres: Arc<dyn GenreRepository>,
    actors: Arc<dyn ActorRepository>,
    directors: Arc<dyn DirectorRepository>,
}

impl MovieService {
    pub fn new(
        movies: Arc<dyn MovieRepository>,
        genres: Arc<dyn GenreRepository>,
        actors: Arc<dyn ActorRepository>,
        directors: Arc<dyn DirectorRepository>,
    ) -> Self {
        Self {
            movies,
            genres,
            actors,
            directors,
        }
    }

    pub async fn get_all(&self) -> Result<Vec<MovieDto>, ServiceError> {
        let movies = self.movies.find_all().await?;
        Ok(movies.into_iter().map(MovieDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<MovieDto, ServiceError> {
        validation::require_positive_id("id", id)?;
        self.movies
            .find_by_id(id)
            .await?
            .map(MovieDto::from)
            .ok_or_else(|| ServiceError::not_found("Movie", id))
    }

    pub async fn create(&self, dto: MovieDto) -> Result<MovieDto, ServiceError> {
        self.validate(&dto)?;
        self.check_references(&dto).await?;

        let movie = self.movies.persist(dto.into_new()).await?;
        tracing::info!("Created movie {} ({:?})", movie.id, movie.title);
        Ok(movie.into())
    }

    pub async fn update(&self, dto: MovieDto) -> Result<MovieDto, ServiceError> {
        let id = dto
            .id
            .ok_or_else(|| ServiceError::BadRequest("id is required for update".to_string()))?;
        validation::require_positive_id("id", id)?;
        self.validate(&dto)?;
        self.check_references(&dto).await?;

        let movie = self
            .movies
            .update(dto.into_entity(id))
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::NotFound(_) => ServiceError::not_found("Movie", id),
                other => other,
            })?;
        tracing::debug!("Updated movie {}", id);
        Ok(movie.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        validation::require_positive_id("id", id)?;
        if self.movies.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Movie", id));
        }
        self.movies.delete(id).await?;
        tracing::info!("Deleted movie {}", id);
        Ok(())
    }

    pub async fn search_by_title(&self, text: &str) -> Result<Vec<MovieDto>, ServiceError> {
        validation::require_text("search text", text)?;
        let movies = self.movies.find_by_title_containing(text.trim()).await?;
        Ok(movies.into_iter().map(MovieDto::from).collect())
    }

    pub async fn get_by_director(&self, director_id: i32) -> Result<Vec<MovieDto>, ServiceError> {
        validation::require_positive_id("director_id", director_id)?;
        if self.directors.find_by_id(director_id).await?.is_none() {
            return Err(ServiceError::not_found("Director", director_id));
        }
        let movies = self.movies.find_by_director_id(director_id).await?;
        Ok(movies.into_iter().map(MovieDto::from).collect())
    }

    pub async fn find_by_external_id(
        &self,
        external_id: i32,
    ) -> Result<Option<MovieDto>, ServiceError> {
        validation::require_positive_id("external_id", external_id)?;
        Ok(self
            .movies
            .find_by_external_id(external_id)
            .await?
            .map(MovieDto::from))
    }

    /// Movie with the same title and release date, if already catalogued
    pub async fn find_duplicate(
        &self,
        title: &str,
        release_date: Option<NaiveDate>,
    ) -> Result<Option<MovieDto>, ServiceError> {
        Ok(self
            .movies
            .find_by_title_and_release_date(title.trim(), release_date)
            .await?
            .map(MovieDto::from))
    }

    /// Point the movie at `director_id`, or clear it with `None`
    pub async fn assign_director(
        &self,
        movie_id: i32,
        director_id: Option<i32>,
    ) -> Result<MovieDto, ServiceError> {
        validation::require_positive_id("movie_id", movie_id)?;
        if let Some(director_id) = director_id {
            validation::require_positive_id("director_id", director_id)?;
        }
        let movie = self.movies.set_director(movie_id, director_id).await?;
        Ok(movie.into())
    }

    pub async fn add_genre(&self, movie_id: i32, genre_id: i32) -> Result<MovieDto, ServiceError> {
        validation::require_positive_id("movie_id", movie_id)?;
        validation::require_positive_id("genre_id", genre_id)?;
        Ok(self.movies.add_genre(movie_id, genre_id).await?.into())
    }

    pub async fn remove_genre(
        &self,
        movie_id: i32,
        genre_id: i32,
    ) -> Result<MovieDto, ServiceError> {
        validation::require_positive_id("movie_id", movie_id)?;
        validation::require_positive_id("genre_id", genre_id)?;
        Ok(self.movies.remove_genre(movie_id, genre_id).await?.into())
    }

    pub async fn add_actor(&self, movie_id: i32, actor_id: i32) -> Result<MovieDto, ServiceError> {
        validation::require_positive_id("movie_id", movie_id)?;
        validation::require_positive_id("actor_id", actor_id)?;
        Ok(self.movies.add_actor(movie_id, actor_id).await?.into())
    }

    pub async fn remove_actor(
        &self,
        movie_id: i32,
        actor_id: i32,
    ) -> Result<MovieDto, ServiceError> {
        validation::require_positive_id("movie_id", movie_id)?;
        validation::require_positive_id("actor_id", actor_id)?;
        Ok(self.movies.remove_actor(movie_id, actor_id).await?.into())
    }

    fn validate(&self, dto: &MovieDto) -> Result<(), ServiceError> {
        validation::require_text("title", &dto.title)?;
        validation::validate_release_date(dto.release_date, validation::current_year())?;
        validation::validate_rating(dto.rating)?;
        validation::validate_language(dto.original_language.as_deref())?;
        if let Some(external_id) = dto.external_id {
            validation::require_positive_id("external_id", external_id)?;
        }
        if let Some(director_id) = dto.director_id {
            validation::require_positive_id("director_id", director_id)?;
        }
        validation::require_positive_ids("genre_ids", &dto.genre_ids)?;
        validation::require_positive_ids("actor_ids", &dto.actor_ids)?;
        Ok(())
    }

    async fn check_references(&self, dto: &MovieDto) -> Result<(), ServiceError> {
        if let Some(director_id) = dto.director_id
            && self.directors.find_by_id(director_id).await?.is_none()
        {
            return Err(ServiceError::not_found("Director", director_id));
        }
        for &genre_id in &dto.genre_ids {
            if self.genres.find_by_id(genre_id).await?.is_none() {
                return Err(ServiceError::not_found("Genre", genre_id));
            }
        }
        for &actor_id in &dto.actor_ids {
            if self.actors.find_by_id(actor_id).await?.is_none() {
                return Err(ServiceError::not_found("Actor", actor_id));
            }
        }
        Ok(())
    }
}
