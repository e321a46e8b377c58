use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Actor, NewActor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: Option<i32>,
    pub name: String,
    pub age: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self, director_ids: BTreeSet<i32>, movie_ids: BTreeSet<i32>) -> Actor {
        Actor {
            id: self.id,
            external_id: self.external_id,
            name: self.name,
            age: self.age,
            director_ids,
            movie_ids,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorDto {
    pub id: Option<i32>,
    pub external_id: Option<i32>,
    #[serde(default)]
    pub name: String,
    pub age: Option<i32>,
    #[serde(default)]
    pub director_ids: BTreeSet<i32>,
    /// Filled on reads only; casting is changed through the movie side.
    #[serde(default)]
    pub movie_ids: BTreeSet<i32>,
}

impl From<Actor> for ActorDto {
    fn from(actor: Actor) -> Self {
        Self {
            id: Some(actor.id),
            external_id: actor.external_id,
            name: actor.name,
            age: actor.age,
            director_ids: actor.director_ids,
            movie_ids: actor.movie_ids,
        }
    }
}

impl ActorDto {
    pub fn into_new(self) -> NewActor {
        NewActor {
            external_id: self.external_id,
            name: self.name.trim().to_string(),
            age: self.age,
            director_ids: self.director_ids,
        }
    }

    pub fn into_entity(self, id: i32) -> Actor {
        Actor {
            id,
            external_id: self.external_id,
            name: self.name.trim().to_string(),
            age: self.age,
            director_ids: self.director_ids,
            movie_ids: self.movie_ids,
        }
    }
}
