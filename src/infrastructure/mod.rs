//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - Configuration loading (config)
//! - Tracing subscriber setup (telemetry)
//! - Repository implementations (repositories)
//! - Application state (state)

pub mod config;
pub mod db;
pub mod repositories;
pub mod state;
pub mod telemetry;

pub use repositories::*;
pub use state::AppState;
