//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{ActorRepository, DirectorRepository, GenreRepository, MovieRepository};
use crate::infrastructure::{
    SeaOrmActorRepository, SeaOrmDirectorRepository, SeaOrmGenreRepository, SeaOrmMovieRepository,
};
use crate::services::{ActorService, DirectorService, GenreService, MovieService};

/// Repositories over one shared connection pool
#[derive(Clone)]
pub struct AppState {
    db: DatabaseConnection,
    pub movie_repo: Arc<dyn MovieRepository>,
    pub genre_repo: Arc<dyn GenreRepository>,
    pub actor_repo: Arc<dyn ActorRepository>,
    pub director_repo: Arc<dyn DirectorRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let movie_repo = Arc::new(SeaOrmMovieRepository::new(db.clone()));
        let genre_repo = Arc::new(SeaOrmGenreRepository::new(db.clone()));
        let actor_repo = Arc::new(SeaOrmActorRepository::new(db.clone()));
        let director_repo = Arc::new(SeaOrmDirectorRepository::new(db.clone()));

        Self {
            db,
            movie_repo,
            genre_repo,
            actor_repo,
            director_repo,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn movie_service(&self) -> MovieService {
        MovieService::new(
            self.movie_repo.clone(),
            self.genre_repo.clone(),
            self.actor_repo.clone(),
            self.director_repo.clone(),
        )
    }

    pub fn genre_service(&self) -> GenreService {
        GenreService::new(self.genre_repo.clone(), self.movie_repo.clone())
    }

    pub fn actor_service(&self) -> ActorService {
        ActorService::new(self.actor_repo.clone(), self.director_repo.clone())
    }

    pub fn director_service(&self) -> DirectorService {
        DirectorService::new(self.director_repo.clone(), self.movie_repo.clone())
    }
}
