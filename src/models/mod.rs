pub mod actor;
pub mod actor_directors;
pub mod director;
pub mod genre;
pub mod movie;
pub mod movie_actors;
pub mod movie_genres;

pub use actor::ActorDto;
pub use director::DirectorDto;
pub use genre::GenreDto;
pub use movie::MovieDto;
