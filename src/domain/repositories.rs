//! Repository trait definitions
//!
//! One repository per entity. Every method is its own unit of work: writes run
//! inside a transaction that is committed on success and rolled back on any
//! error. Nothing is shared between calls, so several calls are never atomic
//! together.
//!
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DomainError;
use super::entities::{Actor, Director, Genre, Movie, NewActor, NewDirector, NewGenre, NewMovie};

/// Repository trait for Movie entity
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Movie>, DomainError>;

    /// Insert the movie with its genre and cast edges
    async fn persist(&self, movie: NewMovie) -> Result<Movie, DomainError>;

    /// Replace every field and owned edge. `NotFound` if the id is gone.
    async fn update(&self, movie: Movie) -> Result<Movie, DomainError>;

    /// Remove the movie if it still exists
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Case-insensitive substring match on the title
    async fn find_by_title_containing(&self, text: &str) -> Result<Vec<Movie>, DomainError>;

    async fn find_by_director_id(&self, director_id: i32) -> Result<Vec<Movie>, DomainError>;

    async fn find_by_genre_id(&self, genre_id: i32) -> Result<Vec<Movie>, DomainError>;

    async fn find_by_external_id(&self, external_id: i32) -> Result<Option<Movie>, DomainError>;

    /// Exact title and release date match, the catalog's duplicate test
    async fn find_by_title_and_release_date(
        &self,
        title: &str,
        release_date: Option<NaiveDate>,
    ) -> Result<Option<Movie>, DomainError>;

    /// Move the movie to another director, or detach it with `None`
    async fn set_director(
        &self,
        movie_id: i32,
        director_id: Option<i32>,
    ) -> Result<Movie, DomainError>;

    async fn add_genre(&self, movie_id: i32, genre_id: i32) -> Result<Movie, DomainError>;

    async fn remove_genre(&self, movie_id: i32, genre_id: i32) -> Result<Movie, DomainError>;

    async fn add_actor(&self, movie_id: i32, actor_id: i32) -> Result<Movie, DomainError>;

    async fn remove_actor(&self, movie_id: i32, actor_id: i32) -> Result<Movie, DomainError>;
}

/// Repository trait for Genre entity
#[async_trait]
pub trait GenreRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError>;

    async fn persist(&self, genre: NewGenre) -> Result<Genre, DomainError>;

    /// Replace name and external id. Movie edges are owned by movies.
    async fn update(&self, genre: Genre) -> Result<Genre, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Exact name match
    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError>;

    /// Case-insensitive substring match on the name
    async fn find_by_name_containing(&self, text: &str) -> Result<Vec<Genre>, DomainError>;

    async fn find_by_external_id(&self, external_id: i32) -> Result<Option<Genre>, DomainError>;
}

/// Repository trait for Actor entity
#[async_trait]
pub trait ActorRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Actor>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Actor>, DomainError>;

    async fn persist(&self, actor: NewActor) -> Result<Actor, DomainError>;

    /// Replace scalar fields and the director edges
    async fn update(&self, actor: Actor) -> Result<Actor, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn find_by_external_id(&self, external_id: i32) -> Result<Option<Actor>, DomainError>;

    async fn find_by_name_containing(&self, text: &str) -> Result<Vec<Actor>, DomainError>;

    async fn add_director(&self, actor_id: i32, director_id: i32) -> Result<Actor, DomainError>;

    async fn remove_director(&self, actor_id: i32, director_id: i32)
    -> Result<Actor, DomainError>;
}

/// Repository trait for Director entity
#[async_trait]
pub trait DirectorRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Director>, DomainError>;

    async fn find_all(&self) -> Result<Vec<Director>, DomainError>;

    async fn persist(&self, director: NewDirector) -> Result<Director, DomainError>;

    /// Replace scalar fields. Both relation sets are inverse sides.
    async fn update(&self, director: Director) -> Result<Director, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn find_by_external_id(
        &self,
        external_id: i32,
    ) -> Result<Option<Director>, DomainError>;

    async fn find_by_name_containing(&self, text: &str) -> Result<Vec<Director>, DomainError>;
}
