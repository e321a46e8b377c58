//! SeaORM implementation of MovieRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::relations::{self, RelationMap};
use crate::domain::{DomainError, Movie, MovieRepository, NewMovie};
use crate::models::movie::{self, ActiveModel, Column, Entity as MovieEntity};
use crate::models::{actor, director, genre, movie_actors, movie_genres};

/// SeaORM-based implementation of MovieRepository
pub struct SeaOrmMovieRepository {
    db: DatabaseConnection,
}

impl SeaOrmMovieRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn hydrate_all<C: ConnectionTrait>(
    conn: &C,
    models: Vec<movie::Model>,
) -> Result<Vec<Movie>, DbErr> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut genres: RelationMap = relations::genres_by_movie(conn, &ids).await?;
    let mut actors: RelationMap = relations::actors_by_movie(conn, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let id = m.id;
            m.into_domain(
                relations::take(&mut genres, id),
                relations::take(&mut actors, id),
            )
        })
        .collect())
}

async fn hydrate<C: ConnectionTrait>(conn: &C, model: movie::Model) -> Result<Movie, DbErr> {
    let mut movies = hydrate_all(conn, vec![model]).await?;
    movies
        .pop()
        .ok_or_else(|| DbErr::RecordNotFound("movie vanished while loading".to_string()))
}

async fn find_model<C: ConnectionTrait>(conn: &C, id: i32) -> Result<movie::Model, DomainError> {
    MovieEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound)
}

#[async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Movie>, DomainError> {
        match MovieEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(hydrate(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Movie>, DomainError> {
        let models = MovieEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn persist(&self, movie: NewMovie) -> Result<Movie, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            external_id: Set(movie.external_id),
            title: Set(movie.title),
            release_date: Set(movie.release_date),
            original_language: Set(movie.original_language),
            rating: Set(movie.rating),
            director_id: Set(movie.director_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        relations::replace_movie_genres(&txn, model.id, &movie.genre_ids).await?;
        relations::replace_movie_actors(&txn, model.id, &movie.actor_ids).await?;

        txn.commit().await?;
        Ok(model.into_domain(movie.genre_ids, movie.actor_ids))
    }

    async fn update(&self, movie: Movie) -> Result<Movie, DomainError> {
        let txn = self.db.begin().await?;
        let existing = find_model(&txn, movie.id).await?;

        let mut active: ActiveModel = existing.into();
        active.external_id = Set(movie.external_id);
        active.title = Set(movie.title);
        active.release_date = Set(movie.release_date);
        active.original_language = Set(movie.original_language);
        active.rating = Set(movie.rating);
        active.director_id = Set(movie.director_id);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&txn).await?;

        relations::replace_movie_genres(&txn, model.id, &movie.genre_ids).await?;
        relations::replace_movie_actors(&txn, model.id, &movie.actor_ids).await?;

        txn.commit().await?;
        Ok(model.into_domain(movie.genre_ids, movie.actor_ids))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        if let Some(model) = MovieEntity::find_by_id(id).one(&txn).await? {
            movie_genres::Entity::delete_many()
                .filter(movie_genres::Column::MovieId.eq(id))
                .exec(&txn)
                .await?;
            movie_actors::Entity::delete_many()
                .filter(movie_actors::Column::MovieId.eq(id))
                .exec(&txn)
                .await?;
            model.delete(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn find_by_title_containing(&self, text: &str) -> Result<Vec<Movie>, DomainError> {
        let models: Vec<_> = MovieEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|m| relations::contains_ignore_case(&m.title, text))
            .collect();
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn find_by_director_id(&self, director_id: i32) -> Result<Vec<Movie>, DomainError> {
        let models = MovieEntity::find()
            .filter(Column::DirectorId.eq(director_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn find_by_genre_id(&self, genre_id: i32) -> Result<Vec<Movie>, DomainError> {
        let Some(genre) = genre::Entity::find_by_id(genre_id).one(&self.db).await? else {
            return Ok(Vec::new());
        };

        let models = genre
            .find_related(MovieEntity)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn find_by_external_id(&self, external_id: i32) -> Result<Option<Movie>, DomainError> {
        match MovieEntity::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await?
        {
            Some(model) => Ok(Some(hydrate(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_title_and_release_date(
        &self,
        title: &str,
        release_date: Option<NaiveDate>,
    ) -> Result<Option<Movie>, DomainError> {
        let query = MovieEntity::find().filter(Column::Title.eq(title));
        let query = match release_date {
            Some(date) => query.filter(Column::ReleaseDate.eq(date)),
            None => query.filter(Column::ReleaseDate.is_null()),
        };

        match query.order_by_asc(Column::Id).one(&self.db).await? {
            Some(model) => Ok(Some(hydrate(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn set_director(
        &self,
        movie_id: i32,
        director_id: Option<i32>,
    ) -> Result<Movie, DomainError> {
        let txn = self.db.begin().await?;
        let existing = find_model(&txn, movie_id).await?;
        if let Some(director_id) = director_id {
            director::Entity::find_by_id(director_id)
                .one(&txn)
                .await?
                .ok_or(DomainError::NotFound)?;
        }

        let model = if existing.director_id == director_id {
            existing
        } else {
            let mut active: ActiveModel = existing.into();
            active.director_id = Set(director_id);
            active.updated_at = Set(chrono::Utc::now().to_rfc3339());
            active.update(&txn).await?
        };

        let movie = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(movie)
    }

    async fn add_genre(&self, movie_id: i32, genre_id: i32) -> Result<Movie, DomainError> {
        let txn = self.db.begin().await?;
        let model = find_model(&txn, movie_id).await?;
        genre::Entity::find_by_id(genre_id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let linked = movie_genres::Entity::find_by_id((movie_id, genre_id))
            .one(&txn)
            .await?;
        if linked.is_none() {
            movie_genres::Entity::insert(movie_genres::ActiveModel {
                movie_id: Set(movie_id),
                genre_id: Set(genre_id),
            })
            .exec_without_returning(&txn)
            .await?;
        }

        let movie = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(movie)
    }

    async fn remove_genre(&self, movie_id: i32, genre_id: i32) -> Result<Movie, DomainError> {
        let txn = self.db.begin().await?;
        let model = find_model(&txn, movie_id).await?;
        movie_genres::Entity::delete_by_id((movie_id, genre_id))
            .exec(&txn)
            .await?;

        let movie = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(movie)
    }

    async fn add_actor(&self, movie_id: i32, actor_id: i32) -> Result<Movie, DomainError> {
        let txn = self.db.begin().await?;
        let model = find_model(&txn, movie_id).await?;
        actor::Entity::find_by_id(actor_id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let linked = movie_actors::Entity::find_by_id((movie_id, actor_id))
            .one(&txn)
            .await?;
        if linked.is_none() {
            movie_actors::Entity::insert(movie_actors::ActiveModel {
                movie_id: Set(movie_id),
                actor_id: Set(actor_id),
            })
            .exec_without_returning(&txn)
            .await?;
        }

        let movie = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(movie)
    }

    async fn remove_actor(&self, movie_id: i32, actor_id: i32) -> Result<Movie, DomainError> {
        let txn = self.db.begin().await?;
        let model = find_model(&txn, movie_id).await?;
        movie_actors::Entity::delete_by_id((movie_id, actor_id))
            .exec(&txn)
            .await?;

        let movie = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(movie)
    }
}
