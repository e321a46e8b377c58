//! Actor Service

use std::sync::Arc;

use super::validation;
use super::ServiceError;
use crate::domain::{ActorRepository, DirectorRepository};
use crate::models::ActorDto;

pub struct ActorService {
    actors: Arc<dyn ActorRepository>,
    directors: Arc<dyn DirectorRepository>,
}

impl ActorService {
    pub fn new(actors: Arc<dyn ActorRepository>, directors: Arc<dyn DirectorRepository>) -> Self {
        Self { actors, directors }
    }

    pub async fn get_all(&self) -> Result<Vec<ActorDto>, ServiceError> {
        let actors = self.actors.find_all().await?;
        Ok(actors.into_iter().map(ActorDto::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<ActorDto, ServiceError> {
        validation::require_positive_id("id", id)?;
        self.actors
            .find_by_id(id)
            .await?
            .map(ActorDto::from)
            .ok_or_else(|| ServiceError::not_found("Actor", id))
    }

    pub async fn create(&self, dto: ActorDto) -> Result<ActorDto, ServiceError> {
        validate(&dto)?;
        self.check_directors(&dto).await?;

        let actor = self.actors.persist(dto.into_new()).await?;
        tracing::info!("Created actor {} ({:?})", actor.id, actor.name);
        Ok(actor.into())
    }

    pub async fn update(&self, dto: ActorDto) -> Result<ActorDto, ServiceError> {
        let id = dto
            .id
            .ok_or_else(|| ServiceError::BadRequest("id is required for update".to_string()))?;
        validation::require_positive_id("id", id)?;
        validate(&dto)?;
        self.check_directors(&dto).await?;

        let actor = self
            .actors
            .update(dto.into_entity(id))
            .await
            .map_err(|e| match ServiceError::from(e) {
                ServiceError::NotFound(_) => ServiceError::not_found("Actor", id),
                other => other,
            })?;
        Ok(actor.into())
    }

    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        validation::require_positive_id("id", id)?;
        if self.actors.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("Actor", id));
        }
        self.actors.delete(id).await?;
        tracing::info!("Deleted actor {}", id);
        Ok(())
    }

    pub async fn search_by_name(&self, text: &str) -> Result<Vec<ActorDto>, ServiceError> {
        validation::require_text("search text", text)?;
        let actors = self.actors.find_by_name_containing(text.trim()).await?;
        Ok(actors.into_iter().map(ActorDto::from).collect())
    }

    pub async fn find_by_external_id(
        &self,
        external_id: i32,
    ) -> Result<Option<ActorDto>, ServiceError> {
        validation::require_positive_id("external_id", external_id)?;
        Ok(self
            .actors
            .find_by_external_id(external_id)
            .await?
            .map(ActorDto::from))
    }

    pub async fn add_director(
        &self,
        actor_id: i32,
        director_id: i32,
    ) -> Result<ActorDto, ServiceError> {
        validation::require_positive_id("actor_id", actor_id)?;
        validation::require_positive_id("director_id", director_id)?;
        Ok(self.actors.add_director(actor_id, director_id).await?.into())
    }

    pub async fn remove_director(
        &self,
        actor_id: i32,
        director_id: i32,
    ) -> Result<ActorDto, ServiceError> {
        validation::require_positive_id("actor_id", actor_id)?;
        validation::require_positive_id("director_id", director_id)?;
        Ok(self.actors.remove_director(actor_id, director_id).await?.into())
    }

    async fn check_directors(&self, dto: &ActorDto) -> Result<(), ServiceError> {
        for &director_id in &dto.director_ids {
            if self.directors.find_by_id(director_id).await?.is_none() {
                return Err(ServiceError::not_found("Director", director_id));
            }
        }
        Ok(())
    }
}

fn validate(dto: &ActorDto) -> Result<(), ServiceError> {
    validation::require_text("name", &dto.name)?;
    validation::validate_age(dto.age)?;
    if let Some(external_id) = dto.external_id {
        validation::require_positive_id("external_id", external_id)?;
    }
    validation::require_positive_ids("director_ids", &dto.director_ids)
}
