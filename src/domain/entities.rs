//! Domain entities
//!
//! Persisted entities carry the store-assigned surrogate `id`. Their identity
//! (equality and hashing) is that id alone; business fields and relation sets
//! are ignored so that two snapshots of the same row compare equal.
//!
//! Relations are summarized as sorted id sets, never as nested objects.
//! Transient values (`New*`) have no id and are produced by the `builder`
//! constructors on each entity.

use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;

macro_rules! identity_by_id {
    ($($entity:ty),* $(,)?) => {
        $(
            impl PartialEq for $entity {
                fn eq(&self, other: &Self) -> bool {
                    self.id == other.id
                }
            }

            impl Eq for $entity {}

            impl Hash for $entity {
                fn hash<H: Hasher>(&self, state: &mut H) {
                    self.id.hash(state);
                }
            }
        )*
    };
}

identity_by_id!(Movie, Actor, Director, Genre);

#[derive(Debug, Clone)]
pub struct Movie {
    pub id: i32,
    pub external_id: Option<i32>,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub original_language: Option<String>,
    pub rating: Option<f64>,
    pub director_id: Option<i32>,
    pub genre_ids: BTreeSet<i32>,
    pub actor_ids: BTreeSet<i32>,
}

impl Movie {
    pub fn builder(title: impl Into<String>) -> NewMovie {
        NewMovie {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// A movie that has not been persisted yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMovie {
    pub external_id: Option<i32>,
    pub title: String,
    pub release_date: Option<NaiveDate>,
    pub original_language: Option<String>,
    pub rating: Option<f64>,
    pub director_id: Option<i32>,
    pub genre_ids: BTreeSet<i32>,
    pub actor_ids: BTreeSet<i32>,
}

impl NewMovie {
    pub fn external_id(mut self, external_id: i32) -> Self {
        self.external_id = Some(external_id);
        self
    }

    pub fn release_date(mut self, release_date: Option<NaiveDate>) -> Self {
        self.release_date = release_date;
        self
    }

    pub fn original_language(mut self, language: Option<String>) -> Self {
        self.original_language = language;
        self
    }

    pub fn rating(mut self, rating: Option<f64>) -> Self {
        self.rating = rating;
        self
    }

    pub fn director(mut self, director_id: Option<i32>) -> Self {
        self.director_id = director_id;
        self
    }

    pub fn genres(mut self, genre_ids: impl IntoIterator<Item = i32>) -> Self {
        self.genre_ids.extend(genre_ids);
        self
    }

    pub fn actors(mut self, actor_ids: impl IntoIterator<Item = i32>) -> Self {
        self.actor_ids.extend(actor_ids);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i32,
    pub external_id: Option<i32>,
    pub name: String,
    pub age: Option<i32>,
    /// Owned by the actor side.
    pub director_ids: BTreeSet<i32>,
    /// Derived from movie casts; read-only here.
    pub movie_ids: BTreeSet<i32>,
}

impl Actor {
    pub fn builder(name: impl Into<String>) -> NewActor {
        NewActor {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewActor {
    pub external_id: Option<i32>,
    pub name: String,
    pub age: Option<i32>,
    pub director_ids: BTreeSet<i32>,
}

impl NewActor {
    pub fn external_id(mut self, external_id: i32) -> Self {
        self.external_id = Some(external_id);
        self
    }

    pub fn age(mut self, age: Option<i32>) -> Self {
        self.age = age;
        self
    }

    pub fn directors(mut self, director_ids: impl IntoIterator<Item = i32>) -> Self {
        self.director_ids.extend(director_ids);
        self
    }
}

pub const DEFAULT_DIRECTOR_JOB: &str = "Directing";

#[derive(Debug, Clone)]
pub struct Director {
    pub id: i32,
    pub external_id: Option<i32>,
    pub name: String,
    pub age: Option<i32>,
    pub job: Option<String>,
    /// Inverse of `Actor::director_ids`.
    pub actor_ids: BTreeSet<i32>,
    /// Inverse of `Movie::director_id`.
    pub movie_ids: BTreeSet<i32>,
}

impl Director {
    pub fn builder(name: impl Into<String>) -> NewDirector {
        NewDirector {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn job_title(&self) -> &str {
        self.job.as_deref().unwrap_or(DEFAULT_DIRECTOR_JOB)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDirector {
    pub external_id: Option<i32>,
    pub name: String,
    pub age: Option<i32>,
    pub job: Option<String>,
}

impl NewDirector {
    pub fn external_id(mut self, external_id: i32) -> Self {
        self.external_id = Some(external_id);
        self
    }

    pub fn age(mut self, age: Option<i32>) -> Self {
        self.age = age;
        self
    }

    pub fn job(mut self, job: Option<String>) -> Self {
        self.job = job;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Genre {
    pub id: i32,
    pub external_id: Option<i32>,
    pub name: String,
    /// Inverse of `Movie::genre_ids`.
    pub movie_ids: BTreeSet<i32>,
}

impl Genre {
    pub fn builder(name: impl Into<String>) -> NewGenre {
        NewGenre {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGenre {
    pub external_id: Option<i32>,
    pub name: String,
}

impl NewGenre {
    pub fn external_id(mut self, external_id: i32) -> Self {
        self.external_id = Some(external_id);
        self
    }
}
