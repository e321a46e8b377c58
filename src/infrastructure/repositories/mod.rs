//! Repository implementations using SeaORM

pub mod actor_repository;
pub mod director_repository;
pub mod genre_repository;
pub mod movie_repository;
mod relations;

pub use actor_repository::SeaOrmActorRepository;
pub use director_repository::SeaOrmDirectorRepository;
pub use genre_repository::SeaOrmGenreRepository;
pub use movie_repository::SeaOrmMovieRepository;
