//! SeaORM implementation of GenreRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::relations;
use crate::domain::{DomainError, Genre, GenreRepository, NewGenre};
use crate::models::genre::{self, ActiveModel, Column, Entity as GenreEntity};
use crate::models::movie_genres;

/// SeaORM-based implementation of GenreRepository
pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn hydrate_all<C: ConnectionTrait>(
    conn: &C,
    models: Vec<genre::Model>,
) -> Result<Vec<Genre>, DbErr> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut movies = relations::movies_by_genre(conn, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let id = m.id;
            m.into_domain(relations::take(&mut movies, id))
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(
    conn: &C,
    model: Option<genre::Model>,
) -> Result<Option<Genre>, DbErr> {
    match model {
        Some(model) => Ok(hydrate_all(conn, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Genre>, DomainError> {
        let model = GenreEntity::find_by_id(id).one(&self.db).await?;
        Ok(hydrate_one(&self.db, model).await?)
    }

    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let models = GenreEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn persist(&self, genre: NewGenre) -> Result<Genre, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            external_id: Set(genre.external_id),
            name: Set(genre.name),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model.into_domain(Default::default()))
    }

    async fn update(&self, genre: Genre) -> Result<Genre, DomainError> {
        let txn = self.db.begin().await?;
        let existing = GenreEntity::find_by_id(genre.id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.external_id = Set(genre.external_id);
        active.name = Set(genre.name);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&txn).await?;
        let updated = hydrate_one(&txn, Some(model)).await?;

        txn.commit().await?;
        updated.ok_or(DomainError::NotFound)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        if let Some(model) = GenreEntity::find_by_id(id).one(&txn).await? {
            movie_genres::Entity::delete_many()
                .filter(movie_genres::Column::GenreId.eq(id))
                .exec(&txn)
                .await?;
            model.delete(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Genre>, DomainError> {
        let model = GenreEntity::find()
            .filter(Column::Name.eq(name))
            .order_by_asc(Column::Id)
            .one(&self.db)
            .await?;
        Ok(hydrate_one(&self.db, model).await?)
    }

    async fn find_by_name_containing(&self, text: &str) -> Result<Vec<Genre>, DomainError> {
        let models: Vec<_> = GenreEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|m| relations::contains_ignore_case(&m.name, text))
            .collect();
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn find_by_external_id(&self, external_id: i32) -> Result<Option<Genre>, DomainError> {
        let model = GenreEntity::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await?;
        Ok(hydrate_one(&self.db, model).await?)
    }
}
