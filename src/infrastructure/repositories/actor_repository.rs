//! SeaORM implementation of ActorRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::relations;
use crate::domain::{Actor, ActorRepository, DomainError, NewActor};
use crate::models::actor::{self, ActiveModel, Column, Entity as ActorEntity};
use crate::models::{actor_directors, director, movie_actors};

/// SeaORM-based implementation of ActorRepository
pub struct SeaOrmActorRepository {
    db: DatabaseConnection,
}

impl SeaOrmActorRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

async fn hydrate_all<C: ConnectionTrait>(
    conn: &C,
    models: Vec<actor::Model>,
) -> Result<Vec<Actor>, DbErr> {
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let mut directors = relations::directors_by_actor(conn, &ids).await?;
    let mut movies = relations::movies_by_actor(conn, &ids).await?;

    Ok(models
        .into_iter()
        .map(|m| {
            let id = m.id;
            m.into_domain(
                relations::take(&mut directors, id),
                relations::take(&mut movies, id),
            )
        })
        .collect())
}

async fn hydrate<C: ConnectionTrait>(conn: &C, model: actor::Model) -> Result<Actor, DomainError> {
    hydrate_all(conn, vec![model])
        .await?
        .pop()
        .ok_or(DomainError::NotFound)
}

async fn find_model<C: ConnectionTrait>(conn: &C, id: i32) -> Result<actor::Model, DomainError> {
    ActorEntity::find_by_id(id)
        .one(conn)
        .await?
        .ok_or(DomainError::NotFound)
}

#[async_trait]
impl ActorRepository for SeaOrmActorRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Actor>, DomainError> {
        match ActorEntity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(hydrate(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Actor>, DomainError> {
        let models = ActorEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn persist(&self, actor: NewActor) -> Result<Actor, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let txn = self.db.begin().await?;

        let model = ActiveModel {
            external_id: Set(actor.external_id),
            name: Set(actor.name),
            age: Set(actor.age),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        relations::replace_actor_directors(&txn, model.id, &actor.director_ids).await?;

        txn.commit().await?;
        Ok(model.into_domain(actor.director_ids, Default::default()))
    }

    async fn update(&self, actor: Actor) -> Result<Actor, DomainError> {
        let txn = self.db.begin().await?;
        let existing = find_model(&txn, actor.id).await?;

        let mut active: ActiveModel = existing.into();
        active.external_id = Set(actor.external_id);
        active.name = Set(actor.name);
        active.age = Set(actor.age);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());
        let model = active.update(&txn).await?;
        relations::replace_actor_directors(&txn, model.id, &actor.director_ids).await?;

        let updated = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let txn = self.db.begin().await?;
        if let Some(model) = ActorEntity::find_by_id(id).one(&txn).await? {
            movie_actors::Entity::delete_many()
                .filter(movie_actors::Column::ActorId.eq(id))
                .exec(&txn)
                .await?;
            actor_directors::Entity::delete_many()
                .filter(actor_directors::Column::ActorId.eq(id))
                .exec(&txn)
                .await?;
            model.delete(&txn).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    async fn find_by_external_id(&self, external_id: i32) -> Result<Option<Actor>, DomainError> {
        match ActorEntity::find()
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await?
        {
            Some(model) => Ok(Some(hydrate(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_name_containing(&self, text: &str) -> Result<Vec<Actor>, DomainError> {
        let models: Vec<_> = ActorEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .filter(|m| relations::contains_ignore_case(&m.name, text))
            .collect();
        Ok(hydrate_all(&self.db, models).await?)
    }

    async fn add_director(&self, actor_id: i32, director_id: i32) -> Result<Actor, DomainError> {
        let txn = self.db.begin().await?;
        let model = find_model(&txn, actor_id).await?;
        director::Entity::find_by_id(director_id)
            .one(&txn)
            .await?
            .ok_or(DomainError::NotFound)?;

        let linked = actor_directors::Entity::find_by_id((actor_id, director_id))
            .one(&txn)
            .await?;
        if linked.is_none() {
            actor_directors::Entity::insert(actor_directors::ActiveModel {
                actor_id: Set(actor_id),
                director_id: Set(director_id),
            })
            .exec_without_returning(&txn)
            .await?;
        }

        let actor = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(actor)
    }

    async fn remove_director(
        &self,
        actor_id: i32,
        director_id: i32,
    ) -> Result<Actor, DomainError> {
        let txn = self.db.begin().await?;
        let model = find_model(&txn, actor_id).await?;
        actor_directors::Entity::delete_by_id((actor_id, director_id))
            .exec(&txn)
            .await?;

        let actor = hydrate(&txn, model).await?;
        txn.commit().await?;
        Ok(actor)
    }
}
