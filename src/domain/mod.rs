//! Domain layer - Pure business abstractions
//!
//! Entities, repository contracts and domain error types. The only framework
//! type referenced here is `sea_orm::DbErr`, for the error conversion.

pub mod entities;
pub mod errors;
pub mod repositories;

pub use entities::*;
pub use errors::DomainError;
pub use repositories::*;
