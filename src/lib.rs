pub mod domain;
pub mod infrastructure;
pub mod models;
pub mod modules;
pub mod services;
pub mod sync;

pub use infrastructure::config;
pub use infrastructure::db;
pub use infrastructure::telemetry;
pub use modules::integrations::tmdb;
