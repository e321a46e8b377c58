use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Movie, NewMovie};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: Option<i32>,
    pub title: String,
    pub release_date: Option<Date>,
    pub original_language: Option<String>,
    pub rating: Option<f64>,
    pub director_id: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::director::Entity",
        from = "Column::DirectorId",
        to = "super::director::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Director,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self, genre_ids: BTreeSet<i32>, actor_ids: BTreeSet<i32>) -> Movie {
        Movie {
            id: self.id,
            external_id: self.external_id,
            title: self.title,
            release_date: self.release_date,
            original_language: self.original_language,
            rating: self.rating,
            director_id: self.director_id,
            genre_ids,
            actor_ids,
        }
    }
}

// DTO for the service boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDto {
    pub id: Option<i32>,
    pub external_id: Option<i32>,
    #[serde(default)]
    pub title: String,
    pub release_date: Option<Date>,
    pub original_language: Option<String>,
    pub rating: Option<f64>,
    pub director_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: BTreeSet<i32>,
    #[serde(default)]
    pub actor_ids: BTreeSet<i32>,
}

impl From<Movie> for MovieDto {
    fn from(movie: Movie) -> Self {
        Self {
            id: Some(movie.id),
            external_id: movie.external_id,
            title: movie.title,
            release_date: movie.release_date,
            original_language: movie.original_language,
            rating: movie.rating,
            director_id: movie.director_id,
            genre_ids: movie.genre_ids,
            actor_ids: movie.actor_ids,
        }
    }
}

impl MovieDto {
    /// Transient movie for insertion. Any `id` on the DTO is ignored.
    pub fn into_new(self) -> NewMovie {
        NewMovie {
            external_id: self.external_id,
            title: self.title.trim().to_string(),
            release_date: self.release_date,
            original_language: self.original_language,
            rating: self.rating,
            director_id: self.director_id,
            genre_ids: self.genre_ids,
            actor_ids: self.actor_ids,
        }
    }

    pub fn into_entity(self, id: i32) -> Movie {
        Movie {
            id,
            external_id: self.external_id,
            title: self.title.trim().to_string(),
            release_date: self.release_date,
            original_language: self.original_language,
            rating: self.rating,
            director_id: self.director_id,
            genre_ids: self.genre_ids,
            actor_ids: self.actor_ids,
        }
    }
}
