use chrono::NaiveDate;
use movie_catalog::db;
use movie_catalog::domain::{
    Actor, ActorRepository, Director, DirectorRepository, DomainError, Genre, GenreRepository,
    Movie, MovieRepository,
};
use movie_catalog::infrastructure::AppState;

async fn setup_test_state() -> AppState {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[tokio::test]
async fn test_persist_and_find_round_trip() {
    let state = setup_test_state().await;
    let drama = state
        .genre_repo
        .persist(Genre::builder("Drama").external_id(18))
        .await
        .unwrap();
    let comedy = state
        .genre_repo
        .persist(Genre::builder("Comedy").external_id(35))
        .await
        .unwrap();
    let director = state
        .director_repo
        .persist(Director::builder("Thomas Vinterberg").age(Some(55)))
        .await
        .unwrap();
    let actor = state
        .actor_repo
        .persist(Actor::builder("Mads Mikkelsen").age(Some(58)))
        .await
        .unwrap();

    let saved = state
        .movie_repo
        .persist(
            Movie::builder("Druk")
                .external_id(580175)
                .release_date(date(2020, 9, 24))
                .original_language(Some("da".to_string()))
                .rating(Some(7.7))
                .director(Some(director.id))
                .genres([drama.id, comedy.id])
                .actors([actor.id]),
        )
        .await
        .unwrap();
    assert!(saved.id > 0);

    let found = state
        .movie_repo
        .find_by_id(saved.id)
        .await
        .unwrap()
        .expect("movie should exist");
    assert_eq!(found.title, "Druk");
    assert_eq!(found.external_id, Some(580175));
    assert_eq!(found.release_date, date(2020, 9, 24));
    assert_eq!(found.original_language.as_deref(), Some("da"));
    assert_eq!(found.rating, Some(7.7));
    assert_eq!(found.director_id, Some(director.id));
    assert_eq!(found.genre_ids, [drama.id, comedy.id].into_iter().collect());
    assert_eq!(found.actor_ids, [actor.id].into_iter().collect());

    // Inverse sides are derived from the same rows
    let director = state
        .director_repo
        .find_by_id(director.id)
        .await
        .unwrap()
        .unwrap();
    assert!(director.movie_ids.contains(&saved.id));
    let drama = state.genre_repo.find_by_id(drama.id).await.unwrap().unwrap();
    assert!(drama.movie_ids.contains(&saved.id));
    let actor = state.actor_repo.find_by_id(actor.id).await.unwrap().unwrap();
    assert!(actor.movie_ids.contains(&saved.id));
}

#[tokio::test]
async fn test_find_by_id_missing_is_none() {
    let state = setup_test_state().await;
    state.db().ping().await.expect("connection alive");
    assert!(state.movie_repo.find_by_id(404).await.unwrap().is_none());
    assert!(state.genre_repo.find_by_id(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_all_is_ordered_by_id() {
    let state = setup_test_state().await;
    for title in ["Festen", "Jagten", "Druk"] {
        state
            .movie_repo
            .persist(Movie::builder(title))
            .await
            .unwrap();
    }

    let titles: Vec<String> = state
        .movie_repo
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["Festen", "Jagten", "Druk"]);
}

#[tokio::test]
async fn test_update_missing_is_not_found_and_creates_nothing() {
    let state = setup_test_state().await;
    let ghost = Genre {
        id: 99,
        external_id: None,
        name: "Ghost".to_string(),
        movie_ids: Default::default(),
    };

    let result = state.genre_repo.update(ghost).await;
    assert_eq!(result, Err(DomainError::NotFound));
    assert!(state.genre_repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_replaces_fields_and_edges() {
    let state = setup_test_state().await;
    let drama = state
        .genre_repo
        .persist(Genre::builder("Drama"))
        .await
        .unwrap();
    let thriller = state
        .genre_repo
        .persist(Genre::builder("Thriller"))
        .await
        .unwrap();
    let mut movie = state
        .movie_repo
        .persist(Movie::builder("Jagten").genres([drama.id]))
        .await
        .unwrap();

    movie.rating = Some(8.3);
    movie.genre_ids = [thriller.id].into_iter().collect();
    let updated = state.movie_repo.update(movie).await.unwrap();

    assert_eq!(updated.rating, Some(8.3));
    let reloaded = state
        .movie_repo
        .find_by_id(updated.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.genre_ids, [thriller.id].into_iter().collect());
}

#[tokio::test]
async fn test_delete_is_noop_when_missing() {
    let state = setup_test_state().await;
    state.movie_repo.delete(12345).await.unwrap();
    state.director_repo.delete(12345).await.unwrap();
}

#[tokio::test]
async fn test_delete_movie_removes_edges() {
    let state = setup_test_state().await;
    let genre = state
        .genre_repo
        .persist(Genre::builder("Drama"))
        .await
        .unwrap();
    let movie = state
        .movie_repo
        .persist(Movie::builder("Festen").genres([genre.id]))
        .await
        .unwrap();

    state.movie_repo.delete(movie.id).await.unwrap();

    assert!(state.movie_repo.find_by_id(movie.id).await.unwrap().is_none());
    let genre = state.genre_repo.find_by_id(genre.id).await.unwrap().unwrap();
    assert!(genre.movie_ids.is_empty());
}

#[tokio::test]
async fn test_delete_director_detaches_movies() {
    let state = setup_test_state().await;
    let director = state
        .director_repo
        .persist(Director::builder("Susanne Bier"))
        .await
        .unwrap();
    let movie = state
        .movie_repo
        .persist(Movie::builder("Hævnen").director(Some(director.id)))
        .await
        .unwrap();

    state.director_repo.delete(director.id).await.unwrap();

    let movie = state.movie_repo.find_by_id(movie.id).await.unwrap().unwrap();
    assert_eq!(movie.director_id, None);
}

#[tokio::test]
async fn test_duplicate_external_id_is_conflict() {
    let state = setup_test_state().await;
    state
        .movie_repo
        .persist(Movie::builder("Druk").external_id(580175))
        .await
        .unwrap();

    let result = state
        .movie_repo
        .persist(Movie::builder("Another Round").external_id(580175))
        .await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
    assert_eq!(state.movie_repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rejected_genre_and_director_inserts_leave_store_usable() {
    let state = setup_test_state().await;
    state
        .genre_repo
        .persist(Genre::builder("Drama").external_id(18))
        .await
        .unwrap();
    let result = state
        .genre_repo
        .persist(Genre::builder("Drama again").external_id(18))
        .await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));

    state
        .director_repo
        .persist(Director::builder("Susanne Bier").external_id(8329))
        .await
        .unwrap();
    let result = state
        .director_repo
        .persist(Director::builder("S. Bier").external_id(8329))
        .await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));

    // the single pooled connection must not be left inside a transaction
    state
        .genre_repo
        .persist(Genre::builder("Comedy").external_id(35))
        .await
        .unwrap();
    assert_eq!(state.genre_repo.find_all().await.unwrap().len(), 2);
    assert_eq!(state.director_repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_genre_edges_are_idempotent() {
    let state = setup_test_state().await;
    let genre = state
        .genre_repo
        .persist(Genre::builder("Drama"))
        .await
        .unwrap();
    let movie = state
        .movie_repo
        .persist(Movie::builder("Festen"))
        .await
        .unwrap();

    state.movie_repo.add_genre(movie.id, genre.id).await.unwrap();
    let twice = state.movie_repo.add_genre(movie.id, genre.id).await.unwrap();
    assert_eq!(twice.genre_ids.len(), 1);

    let removed = state
        .movie_repo
        .remove_genre(movie.id, genre.id)
        .await
        .unwrap();
    assert!(removed.genre_ids.is_empty());
    let again = state
        .movie_repo
        .remove_genre(movie.id, genre.id)
        .await
        .unwrap();
    assert!(again.genre_ids.is_empty());
}

#[tokio::test]
async fn test_edge_to_missing_entity_is_not_found() {
    let state = setup_test_state().await;
    let movie = state
        .movie_repo
        .persist(Movie::builder("Festen"))
        .await
        .unwrap();

    assert_eq!(
        state.movie_repo.add_genre(movie.id, 77).await,
        Err(DomainError::NotFound)
    );
    assert_eq!(
        state.movie_repo.add_actor(movie.id, 77).await,
        Err(DomainError::NotFound)
    );
    assert_eq!(
        state.movie_repo.set_director(movie.id, Some(77)).await,
        Err(DomainError::NotFound)
    );
    assert_eq!(
        state.movie_repo.add_genre(77, 1).await,
        Err(DomainError::NotFound)
    );
    assert_eq!(
        state.actor_repo.add_director(77, 1).await,
        Err(DomainError::NotFound)
    );
}

#[tokio::test]
async fn test_set_director_moves_movie_between_directors() {
    let state = setup_test_state().await;
    let first = state
        .director_repo
        .persist(Director::builder("Lars von Trier"))
        .await
        .unwrap();
    let second = state
        .director_repo
        .persist(Director::builder("Thomas Vinterberg"))
        .await
        .unwrap();
    let movie = state
        .movie_repo
        .persist(Movie::builder("Festen").director(Some(first.id)))
        .await
        .unwrap();

    let moved = state
        .movie_repo
        .set_director(movie.id, Some(second.id))
        .await
        .unwrap();
    assert_eq!(moved.director_id, Some(second.id));

    let first = state.director_repo.find_by_id(first.id).await.unwrap().unwrap();
    let second = state
        .director_repo
        .find_by_id(second.id)
        .await
        .unwrap()
        .unwrap();
    assert!(first.movie_ids.is_empty());
    assert_eq!(second.movie_ids, [movie.id].into_iter().collect());

    let cleared = state.movie_repo.set_director(movie.id, None).await.unwrap();
    assert_eq!(cleared.director_id, None);
}

#[tokio::test]
async fn test_actor_director_edges() {
    let state = setup_test_state().await;
    let director = state
        .director_repo
        .persist(Director::builder("Nicolas Winding Refn"))
        .await
        .unwrap();
    let actor = state
        .actor_repo
        .persist(Actor::builder("Mads Mikkelsen"))
        .await
        .unwrap();

    let actor = state
        .actor_repo
        .add_director(actor.id, director.id)
        .await
        .unwrap();
    assert_eq!(actor.director_ids, [director.id].into_iter().collect());

    let director = state
        .director_repo
        .find_by_id(director.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(director.actor_ids, [actor.id].into_iter().collect());

    let actor = state
        .actor_repo
        .remove_director(actor.id, director.id)
        .await
        .unwrap();
    assert!(actor.director_ids.is_empty());
}

#[tokio::test]
async fn test_genre_name_containing_ignores_ascii_case() {
    let state = setup_test_state().await;
    for name in ["Comedy", "Romcom", "Drama", "Dark COMEDY"] {
        state
            .genre_repo
            .persist(Genre::builder(name))
            .await
            .unwrap();
    }

    let names: Vec<String> = state
        .genre_repo
        .find_by_name_containing("com")
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Comedy", "Romcom", "Dark COMEDY"]);

    assert!(state
        .genre_repo
        .find_by_name("comedy")
        .await
        .unwrap()
        .is_none());
    assert!(state
        .genre_repo
        .find_by_name("Comedy")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_title_containing_folds_danish_letters() {
    let state = setup_test_state().await;
    for title in ["Ønskebørn", "Ærø Express", "Druk"] {
        state
            .movie_repo
            .persist(Movie::builder(title))
            .await
            .unwrap();
    }

    let titles = |movies: Vec<Movie>| -> Vec<String> { movies.into_iter().map(|m| m.title).collect() };

    let found = state.movie_repo.find_by_title_containing("Ønske").await.unwrap();
    assert_eq!(titles(found), vec!["Ønskebørn"]);
    let found = state.movie_repo.find_by_title_containing("ærø").await.unwrap();
    assert_eq!(titles(found), vec!["Ærø Express"]);
    let found = state.movie_repo.find_by_title_containing("BØRN").await.unwrap();
    assert_eq!(titles(found), vec!["Ønskebørn"]);

    state
        .director_repo
        .persist(Director::builder("Nikolaj Arcel"))
        .await
        .unwrap();
    state
        .director_repo
        .persist(Director::builder("Ole Østergaard"))
        .await
        .unwrap();
    let directors = state
        .director_repo
        .find_by_name_containing("øster")
        .await
        .unwrap();
    assert_eq!(directors.len(), 1);
    assert_eq!(directors[0].name, "Ole Østergaard");
}

#[tokio::test]
async fn test_name_containing_treats_wildcards_literally() {
    let state = setup_test_state().await;
    for name in ["Comedy", "Drama", "Sci_Fi", "SciXFi"] {
        state
            .genre_repo
            .persist(Genre::builder(name))
            .await
            .unwrap();
    }

    assert!(state
        .genre_repo
        .find_by_name_containing("%")
        .await
        .unwrap()
        .is_empty());

    let names: Vec<String> = state
        .genre_repo
        .find_by_name_containing("_")
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Sci_Fi"]);

    let names: Vec<String> = state
        .genre_repo
        .find_by_name_containing("sci_fi")
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect();
    assert_eq!(names, vec!["Sci_Fi"]);

    state
        .actor_repo
        .persist(Actor::builder("Mads Mikkelsen"))
        .await
        .unwrap();
    assert!(state
        .actor_repo
        .find_by_name_containing("M%n")
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_movie_lookups() {
    let state = setup_test_state().await;
    let genre = state
        .genre_repo
        .persist(Genre::builder("Drama"))
        .await
        .unwrap();
    let dated = state
        .movie_repo
        .persist(
            Movie::builder("Festen")
                .external_id(309)
                .release_date(date(1998, 6, 19))
                .genres([genre.id]),
        )
        .await
        .unwrap();
    let undated = state
        .movie_repo
        .persist(Movie::builder("Untitled Project"))
        .await
        .unwrap();

    let by_title = state
        .movie_repo
        .find_by_title_containing("FEST")
        .await
        .unwrap();
    assert_eq!(by_title, vec![dated.clone()]);

    let by_external = state.movie_repo.find_by_external_id(309).await.unwrap();
    assert_eq!(by_external, Some(dated.clone()));

    let by_genre = state.movie_repo.find_by_genre_id(genre.id).await.unwrap();
    assert_eq!(by_genre, vec![dated.clone()]);
    assert!(state
        .movie_repo
        .find_by_genre_id(genre.id + 100)
        .await
        .unwrap()
        .is_empty());

    assert_eq!(
        state
            .movie_repo
            .find_by_title_and_release_date("Festen", date(1998, 6, 19))
            .await
            .unwrap(),
        Some(dated)
    );
    assert_eq!(
        state
            .movie_repo
            .find_by_title_and_release_date("Festen", None)
            .await
            .unwrap(),
        None
    );
    assert_eq!(
        state
            .movie_repo
            .find_by_title_and_release_date("Untitled Project", None)
            .await
            .unwrap(),
        Some(undated)
    );
}

#[tokio::test]
async fn test_actor_and_director_lookups() {
    let state = setup_test_state().await;
    let actor = state
        .actor_repo
        .persist(Actor::builder("Trine Dyrholm").external_id(4455))
        .await
        .unwrap();
    let director = state
        .director_repo
        .persist(Director::builder("Susanne Bier").external_id(7788))
        .await
        .unwrap();

    assert_eq!(
        state.actor_repo.find_by_external_id(4455).await.unwrap(),
        Some(actor.clone())
    );
    assert_eq!(
        state.actor_repo.find_by_name_containing("dyr").await.unwrap(),
        vec![actor]
    );
    assert_eq!(
        state.director_repo.find_by_external_id(7788).await.unwrap(),
        Some(director.clone())
    );
    assert_eq!(
        state
            .director_repo
            .find_by_name_containing("BIER")
            .await
            .unwrap(),
        vec![director]
    );
}
