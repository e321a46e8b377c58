//! SeaORM implementation of DirectorRepository

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::relations;
use crate::domain::{Director, DirectorRepository, DomainError, NewDirector};
use crate::models::director::{self, ActiveModel, Column, Entity as DirectorEntity};
use crate::models::{actor_directors, movie};

/// SeaORM-based implementation of DirectorRepository
pub struct SeaOrmDirectorRepository {
    db: DatabaseConnection,
}

impl SeaOrmDirectorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn hydrate_all<C: ConnectionTrait>(
    conn: &C,
    models: Vec<director::Model>,
) -> Result<Vec<Director>, DbErr> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut actors = relations::actors_by_director(conn, &ids).await?;
    let mut movies = relations::movies_by_director(conn, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let id = m.id;
            m.into_domain(
                relations::take(&mut actors, id),
                relations::take(&mut movies, id),
            )
        })
        .collect())
}

async fn hydrate_one<C: ConnectionTrait>(
    conn: &C,
    model: Option<director::Model>,
) -> Result<Option<Director>, DbErr> {
    match model {
        Some(model) => Ok(hydrate_all(conn, vec![model]).await?.pop()),
        None => Ok(None),
    }
}

#[async_trait]
impl DirectorRepository for SeaOrmDirectorRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Director>, DomainError> {
        let model = DirectorEntity::find_by_id(id).one(&self.db).await?;
        Ok(hydrate_one(&self.db, model).await?)
    }

    async fn find_all(&self) -> Result<Vec<Director>, DomainError> {
        let models = DirectorEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn persist(&self, director: NewDirector) -> Result<Director, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            external_id: Set(director.external_id),
            name: Set(director.name),
            age: Set(director.age),
            job: Set(director.job),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(model.into_domain(Default::default(), Default::default()))
    }

    async fn update(&self, director: Director) -> Result<Director, DomainError> {
        let txn = self.db.begin().await?;
        let existing = DirectorEntity::find_by_id(director.id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.external_id = Set(director.external_id);
        active.name = Set(director.name);
        active.age = Set(director.age);
        active.job = Set(director.job);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&txn).await?;
        let updated = hydrate_one(&txn, Some(model)).await?;

        txn.commit().await?;
        updated.ok_or(DomainError::NotFound)
    }

    /// Movies keep their row and lose the director reference
    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        if let Some(model) = DirectorEntity::find_by_id(id).one(&txn).await? {
            movie::Entity::update_many()
                .col_expr(movie::Column::DirectorId, Expr::value(Option::<i32>::None))
                .filter(movie::Column::DirectorId.eq(id))
                .exec(&txn)
                .await?;
            actor_directors::Entity::delete_many()
                .filter(actor_directors::Column::DirectorId.eq(id))
                .exec(&txn)
                .await?;
            model.delete(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn find_by_external_id(
        &self,
        external_id: i32,
    ) -> Result<Option<Director>, DomainError> {
        let model = DirectorEntity::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await?;
        Ok(hydrate_one(&self.db, model).await?)
    }

    async fn find_by_name_containing(&self, text: &str) -> Result<Vec<Director>, DomainError> {
        let models: Vec<_> = DirectorEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|m| relations::contains_ignore_case(&m.name, text))
            .collect();
        Ok(hydrate_all(&self.db, models).await?)
    }
}
