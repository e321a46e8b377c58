//! Discovery listing importer

use std::collections::{BTreeSet, HashMap};

use super::{ActorImport, GenreRefresh, SyncError, SyncFailure, SyncOptions, SyncReport, UNKNOWN_GENRE};
use crate::infrastructure::AppState;
use crate::infrastructure::config::Config;
use crate::models::{ActorDto, DirectorDto, GenreDto, MovieDto};
use crate::modules::integrations::tmdb::{
    CastMember, CrewMember, DiscoverMovie, DiscoverQuery, FromConfigError, TmdbClient,
};
use crate::services::{ActorService, DirectorService, GenreService, MovieService, ServiceError};

pub struct MovieSync {
    client: TmdbClient,
    movies: MovieService,
    genres: GenreService,
    actors: ActorService,
    directors: DirectorService,
    options: SyncOptions,
}

enum Outcome {
    Imported(i32),
    Updated(i32),
    Skipped,
}

impl MovieSync {
    pub fn new(client: TmdbClient, state: &AppState, options: SyncOptions) -> Self {
        Self {
            client,
            movies: state.movie_service(),
            genres: state.genre_service(),
            actors: state.actor_service(),
            directors: state.director_service(),
            options,
        }
    }

    pub fn from_config(
        config: &Config,
        state: &AppState,
        options: SyncOptions,
    ) -> Result<Self, SyncError> {
        let client = TmdbClient::from_config(config).map_err(|e| match e {
            FromConfigError::Config(_) => SyncError::MissingApiKey,
            FromConfigError::Tmdb(e) => SyncError::Client(e),
        })?;
        Ok(Self::new(client, state, options))
    }

    /// Walk the discovery listing and merge every movie into the catalog
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        tracing::info!(
            "🔄 Movie sync started: language={}, window={:?}..{:?}",
            self.options.language,
            self.options.release_from,
            self.options.release_to
        );

        let names = self.genre_names().await?;
        let mut genre_cache = HashMap::new();
        let mut report = SyncReport::default();
        let mut page = 1;
        let mut last_page = 1;

        loop {
            let listing = self
                .client
                .discover_movies(&self.query(page))
                .await
                .map_err(|e| SyncError::page(page, e))?;
            report.pages += 1;

            if page == 1 {
                last_page = self.options.page_limit(listing.total_pages);
                tracing::debug!(
                    "Listing has {:?} pages, walking {}",
                    listing.total_pages,
                    last_page
                );
            }
            if listing.results.is_empty() {
                tracing::debug!("Page {} is empty, stopping", page);
                break;
            }

            for record in listing.results {
                self.merge(record, &names, &mut genre_cache, &mut report)
                    .await
                    .map_err(|e| SyncError::page(page, e))?;
            }
            tracing::debug!("Page {}/{} merged", page, last_page);

            if page >= last_page {
                break;
            }
            page += 1;
        }

        tracing::info!(
            "✅ Movie sync finished: {} pages, {} imported, {} updated, {} skipped",
            report.pages,
            report.imported,
            report.updated,
            report.skipped
        );
        Ok(report)
    }

    /// Upsert the full taxonomy: new external ids are created, changed names renamed
    pub async fn refresh_genres(&self) -> Result<GenreRefresh, SyncError> {
        let list = self
            .client
            .movie_genres(&self.options.genre_language)
            .await
            .map_err(SyncError::Genres)?;
        let mut refresh = GenreRefresh::default();

        for remote in list.genres {
            match self.genres.find_by_external_id(remote.id).await? {
                None => {
                    self.genres
                        .import(GenreDto {
                            external_id: Some(remote.id),
                            name: remote.name,
                            ..Default::default()
                        })
                        .await?;
                    refresh.created += 1;
                }
                Some(mut local) if local.name != remote.name => {
                    tracing::info!("Renaming genre {:?} to {:?}", local.name, remote.name);
                    local.name = remote.name;
                    self.genres.update(local).await?;
                    refresh.renamed += 1;
                }
                Some(_) => refresh.unchanged += 1,
            }
        }
        Ok(refresh)
    }

    /// Import the actors of `/person/popular`, up to `max_pages` pages
    pub async fn import_popular_actors(&self) -> Result<ActorImport, SyncError> {
        let mut import = ActorImport::default();
        let mut page = 1;
        let mut last_page = 1;

        loop {
            let listing = self
                .client
                .popular_people(page)
                .await
                .map_err(|e| SyncError::page(page, e))?;
            import.pages += 1;

            if page == 1 {
                last_page = self.options.page_limit(listing.total_pages);
            }
            if listing.results.is_empty() {
                break;
            }

            for person in listing.results {
                if !person.is_actor() {
                    import.skipped += 1;
                    continue;
                }
                match self.upsert_actor(person.id, &person.name).await {
                    Ok((_, true)) => import.created += 1,
                    Ok((_, false)) => import.known += 1,
                    Err(ServiceError::BadRequest(reason)) => {
                        tracing::warn!("Skipping TMDB person {}: {}", person.id, reason);
                        import.skipped += 1;
                    }
                    Err(e) => return Err(SyncError::page(page, e)),
                }
            }

            if page >= last_page {
                break;
            }
            page += 1;
        }

        tracing::info!(
            "✅ Popular actors imported: {} created, {} known, {} skipped",
            import.created,
            import.known,
            import.skipped
        );
        Ok(import)
    }

    async fn genre_names(&self) -> Result<HashMap<i32, String>, SyncError> {
        let list = self
            .client
            .movie_genres(&self.options.genre_language)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch genre list: {}", e);
                SyncError::Genres(e)
            })?;
        Ok(list.genres.into_iter().map(|g| (g.id, g.name)).collect())
    }

    fn query(&self, page: u32) -> DiscoverQuery {
        DiscoverQuery {
            page,
            original_language: Some(self.options.language.clone()),
            release_from: self.options.release_from,
            release_to: self.options.release_to,
            min_rating: self.options.min_rating,
            max_rating: self.options.max_rating,
        }
    }

    async fn merge(
        &self,
        record: DiscoverMovie,
        names: &HashMap<i32, String>,
        genre_cache: &mut HashMap<i32, i32>,
        report: &mut SyncReport,
    ) -> Result<(), SyncFailure> {
        let mut genre_ids = BTreeSet::new();
        for &external_id in &record.genre_ids {
            let genre_id = self
                .ensure_genre(external_id, names, genre_cache, report)
                .await?;
            genre_ids.insert(genre_id);
        }

        let outcome = match self.existing(&record).await? {
            Some(existing) if !self.options.update_existing => {
                tracing::debug!("Skipping known movie {:?}", existing.title);
                Outcome::Skipped
            }
            Some(mut existing) => {
                let id = existing.id.unwrap_or_default();
                existing.external_id = Some(record.id);
                existing.original_language = record.original_language;
                existing.rating = record.vote_average;
                existing.genre_ids = genre_ids;
                match self.movies.update(existing).await {
                    Ok(_) => Outcome::Updated(id),
                    Err(ServiceError::BadRequest(reason)) => {
                        tracing::warn!("Skipping TMDB movie {}: {}", record.id, reason);
                        Outcome::Skipped
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => {
                let dto = MovieDto {
                    external_id: Some(record.id),
                    title: record.title,
                    release_date: record.release_date,
                    original_language: record.original_language,
                    rating: record.vote_average,
                    genre_ids,
                    ..Default::default()
                };
                match self.movies.create(dto).await {
                    Ok(created) => Outcome::Imported(created.id.unwrap_or_default()),
                    Err(ServiceError::BadRequest(reason)) => {
                        tracing::warn!("Skipping TMDB movie {}: {}", record.id, reason);
                        Outcome::Skipped
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };

        let movie_id = match outcome {
            Outcome::Imported(id) => {
                report.imported += 1;
                id
            }
            Outcome::Updated(id) => {
                report.updated += 1;
                id
            }
            Outcome::Skipped => {
                report.skipped += 1;
                return Ok(());
            }
        };

        if self.options.with_credits {
            self.merge_credits(movie_id, record.id, report).await?;
        }
        Ok(())
    }

    /// Match by external id first, then by title and release date
    async fn existing(&self, record: &DiscoverMovie) -> Result<Option<MovieDto>, ServiceError> {
        if let Some(found) = self.movies.find_by_external_id(record.id).await? {
            return Ok(Some(found));
        }
        self.movies
            .find_duplicate(&record.title, record.release_date)
            .await
    }

    async fn ensure_genre(
        &self,
        external_id: i32,
        names: &HashMap<i32, String>,
        cache: &mut HashMap<i32, i32>,
        report: &mut SyncReport,
    ) -> Result<i32, ServiceError> {
        if let Some(&id) = cache.get(&external_id) {
            return Ok(id);
        }

        let id = match self.genres.find_by_external_id(external_id).await? {
            Some(genre) => genre.id.unwrap_or_default(),
            None => {
                let name = names
                    .get(&external_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_GENRE.to_string());
                let created = self
                    .genres
                    .import(GenreDto {
                        external_id: Some(external_id),
                        name,
                        ..Default::default()
                    })
                    .await?;
                report.genres_created += 1;
                created.id.unwrap_or_default()
            }
        };

        cache.insert(external_id, id);
        Ok(id)
    }

    async fn merge_credits(
        &self,
        movie_id: i32,
        external_id: i32,
        report: &mut SyncReport,
    ) -> Result<(), SyncFailure> {
        let credits = match self.client.movie_credits(external_id).await {
            Ok(credits) => credits,
            Err(e) if e.is_not_found() => {
                tracing::debug!("No credits for TMDB movie {}", external_id);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let director_id = match credits.director() {
            Some(crew) => Some(self.ensure_director(crew, report).await?),
            None => None,
        };

        let mut cast: Vec<&CastMember> = credits.cast.iter().collect();
        cast.sort_by_key(|c| c.order.unwrap_or(i32::MAX));
        for member in cast.into_iter().take(self.options.max_cast) {
            let actor_id = self.ensure_actor(member, report).await?;
            self.movies.add_actor(movie_id, actor_id).await?;
            if let Some(director_id) = director_id {
                self.actors.add_director(actor_id, director_id).await?;
            }
        }

        if let Some(director_id) = director_id {
            self.movies
                .assign_director(movie_id, Some(director_id))
                .await?;
        }
        Ok(())
    }

    async fn ensure_actor(
        &self,
        member: &CastMember,
        report: &mut SyncReport,
    ) -> Result<i32, ServiceError> {
        let (id, created) = self.upsert_actor(member.id, &member.name).await?;
        if created {
            report.actors_created += 1;
        }
        Ok(id)
    }

    /// Local id for a TMDB person, and whether it had to be created
    async fn upsert_actor(
        &self,
        external_id: i32,
        name: &str,
    ) -> Result<(i32, bool), ServiceError> {
        if let Some(actor) = self.actors.find_by_external_id(external_id).await? {
            return Ok((actor.id.unwrap_or_default(), false));
        }
        let created = self
            .actors
            .create(ActorDto {
                external_id: Some(external_id),
                name: name.to_string(),
                ..Default::default()
            })
            .await?;
        Ok((created.id.unwrap_or_default(), true))
    }

    async fn ensure_director(
        &self,
        crew: &CrewMember,
        report: &mut SyncReport,
    ) -> Result<i32, ServiceError> {
        if let Some(director) = self.directors.find_by_external_id(crew.id).await? {
            return Ok(director.id.unwrap_or_default());
        }
        let created = self
            .directors
            .create(DirectorDto {
                external_id: Some(crew.id),
                name: crew.name.clone(),
                job: crew.department.clone(),
                ..Default::default()
            })
            .await?;
        report.directors_created += 1;
        Ok(created.id.unwrap_or_default())
    }
}
