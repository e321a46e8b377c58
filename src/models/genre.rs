use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Genre, NewGenre};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: Option<i32>,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::movie::Entity> for Entity {
    fn to() -> RelationDef {
        super::movie_genres::Relation::Movie.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::movie_genres::Relation::Genre.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self, movie_ids: BTreeSet<i32>) -> Genre {
        Genre {
            id: self.id,
            external_id: self.external_id,
            name: self.name,
            movie_ids,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenreDto {
    pub id: Option<i32>,
    pub external_id: Option<i32>,
    #[serde(default)]
    pub name: String,
    /// Read-only; genres are attached from the movie side.
    #[serde(default)]
    pub movie_ids: BTreeSet<i32>,
}

impl From<Genre> for GenreDto {
    fn from(genre: Genre) -> Self {
        Self {
            id: Some(genre.id),
            external_id: genre.external_id,
            name: genre.name,
            movie_ids: genre.movie_ids,
        }
    }
}

impl GenreDto {
    pub fn into_new(self) -> NewGenre {
        NewGenre {
            external_id: self.external_id,
            name: self.name.trim().to_string(),
        }
    }

    pub fn into_entity(self, id: i32) -> Genre {
        Genre {
            id,
            external_id: self.external_id,
            name: self.name.trim().to_string(),
            movie_ids: self.movie_ids,
        }
    }
}
