use std::collections::BTreeSet;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Director, NewDirector};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "directors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub external_id: Option<i32>,
    pub name: String,
    pub age: Option<i32>,
    pub job: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_domain(self, actor_ids: BTreeSet<i32>, movie_ids: BTreeSet<i32>) -> Director {
        Director {
            id: self.id,
            external_id: self.external_id,
            name: self.name,
            age: self.age,
            job: self.job,
            actor_ids,
            movie_ids,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectorDto {
    pub id: Option<i32>,
    pub external_id: Option<i32>,
    #[serde(default)]
    pub name: String,
    pub age: Option<i32>,
    pub job: Option<String>,
    /// Read-only summaries of the inverse relations.
    #[serde(default)]
    pub actor_ids: BTreeSet<i32>,
    #[serde(default)]
    pub movie_ids: BTreeSet<i32>,
}

impl From<Director> for DirectorDto {
    fn from(director: Director) -> Self {
        let job = Some(director.job_title().to_string());
        Self {
            id: Some(director.id),
            external_id: director.external_id,
            name: director.name,
            age: director.age,
            job,
            actor_ids: director.actor_ids,
            movie_ids: director.movie_ids,
        }
    }
}

impl DirectorDto {
    pub fn into_new(self) -> NewDirector {
        NewDirector {
            external_id: self.external_id,
            name: self.name.trim().to_string(),
            age: self.age,
            job: self.job,
        }
    }

    pub fn into_entity(self, id: i32) -> Director {
        Director {
            id,
            external_id: self.external_id,
            name: self.name.trim().to_string(),
            age: self.age,
            job: self.job,
            actor_ids: self.actor_ids,
            movie_ids: self.movie_ids,
        }
    }
}
