//! Join-table helpers shared by the repositories.
//!
//! Relations are loaded as `owner id -> set of related ids` maps in one query
//! per join table, whatever the number of owners.

use std::collections::{BTreeSet, HashMap};

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};

use crate::models::{actor_directors, movie, movie_actors, movie_genres};

pub(crate) type RelationMap = HashMap<i32, BTreeSet<i32>>;

/// Case-insensitive substring test with full Unicode folding.
///
/// SQLite's `LOWER()` only folds ASCII, so name searches are matched here
/// rather than in a `LIKE` pattern. The needle is taken literally.
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn group_pairs(pairs: impl IntoIterator<Item = (i32, i32)>) -> RelationMap {
    let mut map = RelationMap::new();
    for (owner, related) in pairs {
        map.entry(owner).or_default().insert(related);
    }
    map
}

pub(crate) fn take(map: &mut RelationMap, owner: i32) -> BTreeSet<i32> {
    map.remove(&owner).unwrap_or_default()
}

pub(crate) async fn genres_by_movie<C: ConnectionTrait>(
    conn: &C,
    movie_ids: &[i32],
) -> Result<RelationMap, DbErr> {
    if movie_ids.is_empty() {
        return Ok(RelationMap::new());
    }
    let rows = movie_genres::Entity::find()
        .filter(movie_genres::Column::MovieId.is_in(movie_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(group_pairs(rows.into_iter().map(|r| (r.movie_id, r.genre_id))))
}

pub(crate) async fn movies_by_genre<C: ConnectionTrait>(
    conn: &C,
    genre_ids: &[i32],
) -> Result<RelationMap, DbErr> {
    if genre_ids.is_empty() {
        return Ok(RelationMap::new());
    }
    let rows = movie_genres::Entity::find()
        .filter(movie_genres::Column::GenreId.is_in(genre_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(group_pairs(rows.into_iter().map(|r| (r.genre_id, r.movie_id))))
}

pub(crate) async fn actors_by_movie<C: ConnectionTrait>(
    conn: &C,
    movie_ids: &[i32],
) -> Result<RelationMap, DbErr> {
    if movie_ids.is_empty() {
        return Ok(RelationMap::new());
    }
    let rows = movie_actors::Entity::find()
        .filter(movie_actors::Column::MovieId.is_in(movie_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(group_pairs(rows.into_iter().map(|r| (r.movie_id, r.actor_id))))
}

pub(crate) async fn movies_by_actor<C: ConnectionTrait>(
    conn: &C,
    actor_ids: &[i32],
) -> Result<RelationMap, DbErr> {
    if actor_ids.is_empty() {
        return Ok(RelationMap::new());
    }
    let rows = movie_actors::Entity::find()
        .filter(movie_actors::Column::ActorId.is_in(actor_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(group_pairs(rows.into_iter().map(|r| (r.actor_id, r.movie_id))))
}

pub(crate) async fn directors_by_actor<C: ConnectionTrait>(
    conn: &C,
    actor_ids: &[i32],
) -> Result<RelationMap, DbErr> {
    if actor_ids.is_empty() {
        return Ok(RelationMap::new());
    }
    let rows = actor_directors::Entity::find()
        .filter(actor_directors::Column::ActorId.is_in(actor_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(group_pairs(rows.into_iter().map(|r| (r.actor_id, r.director_id))))
}

pub(crate) async fn actors_by_director<C: ConnectionTrait>(
    conn: &C,
    director_ids: &[i32],
) -> Result<RelationMap, DbErr> {
    if director_ids.is_empty() {
        return Ok(RelationMap::new());
    }
    let rows = actor_directors::Entity::find()
        .filter(actor_directors::Column::DirectorId.is_in(director_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(group_pairs(rows.into_iter().map(|r| (r.director_id, r.actor_id))))
}

/// Movies per director, read from the owning `movies.director_id` column
pub(crate) async fn movies_by_director<C: ConnectionTrait>(
    conn: &C,
    director_ids: &[i32],
) -> Result<RelationMap, DbErr> {
    if director_ids.is_empty() {
        return Ok(RelationMap::new());
    }
    let rows = movie::Entity::find()
        .filter(movie::Column::DirectorId.is_in(director_ids.iter().copied()))
        .all(conn)
        .await?;
    Ok(group_pairs(
        rows.into_iter()
            .filter_map(|m| m.director_id.map(|director_id| (director_id, m.id))),
    ))
}

pub(crate) async fn replace_movie_genres<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    genre_ids: &BTreeSet<i32>,
) -> Result<(), DbErr> {
    movie_genres::Entity::delete_many()
        .filter(movie_genres::Column::MovieId.eq(movie_id))
        .exec(conn)
        .await?;
    if genre_ids.is_empty() {
        return Ok(());
    }
    let rows = genre_ids.iter().map(|&genre_id| movie_genres::ActiveModel {
        movie_id: Set(movie_id),
        genre_id: Set(genre_id),
    });
    movie_genres::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub(crate) async fn replace_movie_actors<C: ConnectionTrait>(
    conn: &C,
    movie_id: i32,
    actor_ids: &BTreeSet<i32>,
) -> Result<(), DbErr> {
    movie_actors::Entity::delete_many()
        .filter(movie_actors::Column::MovieId.eq(movie_id))
        .exec(conn)
        .await?;
    if actor_ids.is_empty() {
        return Ok(());
    }
    let rows = actor_ids.iter().map(|&actor_id| movie_actors::ActiveModel {
        movie_id: Set(movie_id),
        actor_id: Set(actor_id),
    });
    movie_actors::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

pub(crate) async fn replace_actor_directors<C: ConnectionTrait>(
    conn: &C,
    actor_id: i32,
    director_ids: &BTreeSet<i32>,
) -> Result<(), DbErr> {
    actor_directors::Entity::delete_many()
        .filter(actor_directors::Column::ActorId.eq(actor_id))
        .exec(conn)
        .await?;
    if director_ids.is_empty() {
        return Ok(());
    }
    let rows = director_ids
        .iter()
        .map(|&director_id| actor_directors::ActiveModel {
            actor_id: Set(actor_id),
            director_id: Set(director_id),
        });
    actor_directors::Entity::insert_many(rows)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}
