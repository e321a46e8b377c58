//! Thin client for the TMDB v3 API
//!
//! Only the read endpoints the catalog sync needs: the movie genre taxonomy,
//! the discovery listing, per-movie credits and popular people.

mod client;
mod error;
pub mod models;

pub use client::{DiscoverQuery, FromConfigError, TmdbClient};
pub use error::TmdbError;
pub use models::{
    CastMember, CrewMember, DiscoverMovie, GenreList, MovieCredits, PaginatedResponse, Person,
};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Highest page `/discover/movie` will serve
pub const MAX_DISCOVER_PAGES: u32 = 500;

pub type Result<T> = std::result::Result<T, TmdbError>;
