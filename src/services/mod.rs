//! Services Layer
//!
//! Business rules on top of the repositories. Services take and return DTOs,
//! validate them before any write and report failures as `ServiceError`.

pub mod actor_service;
pub mod director_service;
pub mod error;
pub mod genre_service;
pub mod movie_service;
pub mod validation;

pub use actor_service::ActorService;
pub use director_service::DirectorService;
pub use error::ServiceError;
pub use genre_service::GenreService;
pub use movie_service::MovieService;
