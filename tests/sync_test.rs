use movie_catalog::{db, telemetry};
use movie_catalog::infrastructure::AppState;
use movie_catalog::sync::{MovieSync, SyncError, SyncFailure, SyncOptions};
use movie_catalog::tmdb::{TmdbClient, TmdbError};
use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup_test_state() -> AppState {
    let _ = telemetry::init_tracing(telemetry::DEFAULT_FILTER);
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    AppState::new(db)
}

fn client(server: &MockServer) -> TmdbClient {
    TmdbClient::new(reqwest::Client::new(), "test-key", server.uri())
}

fn options() -> SyncOptions {
    SyncOptions {
        language: "da".to_string(),
        max_pages: 10,
        ..Default::default()
    }
}

async fn mount_genres(server: &MockServer, genres: Value) {
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "genres": genres })))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, page: u32, total_pages: u32, results: Value) {
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": page,
            "results": results,
            "total_pages": total_pages,
            "total_results": 20 * total_pages
        })))
        .mount(server)
        .await;
}

fn druk() -> Value {
    json!({
        "id": 580175,
        "title": "Druk",
        "release_date": "2020-09-24",
        "original_language": "da",
        "vote_average": 7.7,
        "genre_ids": [18, 35],
        "adult": false,
        "popularity": 21.4
    })
}

#[tokio::test]
async fn test_one_movie_with_two_new_genres() {
    let server = MockServer::start().await;
    mount_genres(
        &server,
        json!([{ "id": 18, "name": "Drama" }, { "id": 35, "name": "Comedy" }]),
    )
    .await;
    mount_page(&server, 1, 1, json!([druk()])).await;

    let state = setup_test_state().await;
    let report = MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap();

    assert_eq!(report.pages, 1);
    assert_eq!(report.imported, 1);
    assert_eq!(report.genres_created, 2);

    let movies = state.movie_service().get_all().await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Druk");
    assert_eq!(movies[0].external_id, Some(580175));
    assert_eq!(movies[0].rating, Some(7.7));

    let genres = state.genre_service().get_all().await.unwrap();
    assert_eq!(genres.len(), 2);
    let genre_ids: std::collections::BTreeSet<i32> =
        genres.iter().filter_map(|g| g.id).collect();
    assert_eq!(movies[0].genre_ids, genre_ids);
    let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Drama", "Comedy"]);
}

#[tokio::test]
async fn test_second_sync_creates_no_duplicates() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([{ "id": 18, "name": "Drama" }])).await;
    mount_page(&server, 1, 1, json!([druk()])).await;

    let state = setup_test_state().await;
    let sync = MovieSync::new(client(&server), &state, options());
    sync.run().await.unwrap();
    let second = sync.run().await.unwrap();

    assert_eq!(second.imported, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(second.genres_created, 0);
    assert_eq!(state.movie_service().get_all().await.unwrap().len(), 1);
    assert_eq!(state.genre_service().get_all().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unmapped_genre_is_unknown() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(
        &server,
        1,
        1,
        json!([{ "id": 1, "title": "Kød og blod", "genre_ids": [10770] }]),
    )
    .await;

    let state = setup_test_state().await;
    MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap();

    let genre = state
        .genre_service()
        .find_by_external_id(10770)
        .await
        .unwrap()
        .expect("genre should be created");
    assert_eq!(genre.name, "Unknown");
}

#[tokio::test]
async fn test_title_and_date_match_is_skipped() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 1, json!([druk()])).await;

    let state = setup_test_state().await;
    state
        .movie_service()
        .create(movie_catalog::models::MovieDto {
            title: "Druk".to_string(),
            release_date: chrono::NaiveDate::from_ymd_opt(2020, 9, 24),
            ..Default::default()
        })
        .await
        .unwrap();

    let report = MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap();
    assert_eq!(report.skipped, 1);

    let movies = state.movie_service().get_all().await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].external_id, None);
}

#[tokio::test]
async fn test_update_existing_overwrites_mutable_fields() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([{ "id": 18, "name": "Drama" }])).await;
    mount_page(&server, 1, 1, json!([druk()])).await;

    let state = setup_test_state().await;
    let existing = state
        .movie_service()
        .create(movie_catalog::models::MovieDto {
            title: "Druk".to_string(),
            release_date: chrono::NaiveDate::from_ymd_opt(2020, 9, 24),
            rating: Some(5.0),
            ..Default::default()
        })
        .await
        .unwrap();

    let report = MovieSync::new(
        client(&server),
        &state,
        SyncOptions {
            update_existing: true,
            ..options()
        },
    )
    .run()
    .await
    .unwrap();
    assert_eq!(report.updated, 1);

    let movie = state
        .movie_service()
        .get_by_id(existing.id.unwrap())
        .await
        .unwrap();
    assert_eq!(movie.rating, Some(7.7));
    assert_eq!(movie.external_id, Some(580175));
    assert_eq!(movie.original_language.as_deref(), Some("da"));
    assert_eq!(movie.genre_ids.len(), 2);
}

#[tokio::test]
async fn test_invalid_update_is_skipped_not_fatal() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([{ "id": 18, "name": "Drama" }])).await;
    let mut broken = druk();
    broken["vote_average"] = json!(12.5);
    mount_page(&server, 1, 1, json!([broken])).await;

    let state = setup_test_state().await;
    let existing = state
        .movie_service()
        .create(movie_catalog::models::MovieDto {
            title: "Druk".to_string(),
            release_date: chrono::NaiveDate::from_ymd_opt(2020, 9, 24),
            rating: Some(5.0),
            ..Default::default()
        })
        .await
        .unwrap();

    let report = MovieSync::new(
        client(&server),
        &state,
        SyncOptions {
            update_existing: true,
            ..options()
        },
    )
    .run()
    .await
    .unwrap();
    assert_eq!(report.updated, 0);
    assert_eq!(report.skipped, 1);

    let movie = state
        .movie_service()
        .get_by_id(existing.id.unwrap())
        .await
        .unwrap();
    assert_eq!(movie.rating, Some(5.0));
    assert_eq!(movie.external_id, None);
}

#[tokio::test]
async fn test_pages_are_walked_up_to_total() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 2, json!([{ "id": 1, "title": "Festen" }])).await;
    mount_page(&server, 2, 2, json!([{ "id": 2, "title": "Jagten" }])).await;

    let state = setup_test_state().await;
    let report = MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap();

    assert_eq!(report.pages, 2);
    assert_eq!(report.imported, 2);
}

#[tokio::test]
async fn test_max_pages_caps_the_walk() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 40, json!([{ "id": 1, "title": "Festen" }])).await;
    mount_page(&server, 2, 40, json!([{ "id": 2, "title": "Jagten" }])).await;

    let state = setup_test_state().await;
    let report = MovieSync::new(
        client(&server),
        &state,
        SyncOptions {
            max_pages: 1,
            ..options()
        },
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.pages, 1);
    assert_eq!(report.imported, 1);
}

#[tokio::test]
async fn test_empty_page_stops_early() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 5, json!([{ "id": 1, "title": "Festen" }])).await;
    mount_page(&server, 2, 5, json!([])).await;

    let state = setup_test_state().await;
    let report = MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap();

    assert_eq!(report.pages, 2);
    assert_eq!(report.imported, 1);
}

#[tokio::test]
async fn test_http_error_aborts_with_page() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 2, json!([{ "id": 1, "title": "Festen" }])).await;
    Mock::given(method("GET"))
        .and(path("/discover/movie"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let state = setup_test_state().await;
    let err = MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap_err();

    match err {
        SyncError::Page {
            page,
            source: SyncFailure::Tmdb(TmdbError::Api { status_code, message }),
        } => {
            assert_eq!(page, 2);
            assert_eq!(status_code, 500);
            assert_eq!(message, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_listing_reports_json_path() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 1, json!([{ "id": "not-a-number", "title": "Festen" }])).await;

    let state = setup_test_state().await;
    let err = MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap_err();

    match err {
        SyncError::Page {
            page: 1,
            source: SyncFailure::Tmdb(TmdbError::Json { path, .. }),
        } => assert_eq!(path, "results[0].id"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_genre_list_failure_aborts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/genre/movie/list"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status_code": 7,
            "status_message": "Invalid API key"
        })))
        .mount(&server)
        .await;

    let state = setup_test_state().await;
    let err = MovieSync::new(client(&server), &state, options())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Genres(TmdbError::Api {
            status_code: 401,
            ..
        })
    ));
    assert!(state.movie_service().get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_credits_import_cast_and_director() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 1, json!([druk()])).await;
    Mock::given(method("GET"))
        .and(path("/movie/580175/credits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 580175,
            "cast": [
                { "id": 1019, "name": "Mads Mikkelsen", "character": "Martin", "order": 0 },
                { "id": 2201, "name": "Magnus Millang", "character": "Nikolaj", "order": 3 },
                { "id": 2202, "name": "Thomas Bo Larsen", "character": "Tommy", "order": 1 }
            ],
            "crew": [
                { "id": 5001, "name": "Tobias Lindholm", "job": "Screenplay", "department": "Writing" },
                { "id": 5002, "name": "Thomas Vinterberg", "job": "Director", "department": "Directing" }
            ]
        })))
        .mount(&server)
        .await;

    let state = setup_test_state().await;
    let report = MovieSync::new(
        client(&server),
        &state,
        SyncOptions {
            with_credits: true,
            max_cast: 2,
            ..options()
        },
    )
    .run()
    .await
    .unwrap();
    assert_eq!(report.actors_created, 2);
    assert_eq!(report.directors_created, 1);

    let director = state
        .director_service()
        .find_by_external_id(5002)
        .await
        .unwrap()
        .expect("director imported");
    assert_eq!(director.job.as_deref(), Some("Directing"));

    let movie = state
        .movie_service()
        .find_by_external_id(580175)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(movie.director_id, director.id);
    assert_eq!(movie.actor_ids.len(), 2);

    // Billing order decides who gets in
    let actors = state.actor_service();
    assert!(actors.find_by_external_id(1019).await.unwrap().is_some());
    assert!(actors.find_by_external_id(2202).await.unwrap().is_some());
    assert!(actors.find_by_external_id(2201).await.unwrap().is_none());

    let lead = actors.find_by_external_id(1019).await.unwrap().unwrap();
    assert!(lead.director_ids.contains(&director.id.unwrap()));
}

#[tokio::test]
async fn test_missing_credits_are_tolerated() {
    let server = MockServer::start().await;
    mount_genres(&server, json!([])).await;
    mount_page(&server, 1, 1, json!([druk()])).await;
    Mock::given(method("GET"))
        .and(path("/movie/580175/credits"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&server)
        .await;

    let state = setup_test_state().await;
    let report = MovieSync::new(
        client(&server),
        &state,
        SyncOptions {
            with_credits: true,
            ..options()
        },
    )
    .run()
    .await
    .unwrap();

    assert_eq!(report.imported, 1);
    assert_eq!(report.actors_created, 0);
}

#[tokio::test]
async fn test_refresh_genres_creates_and_renames() {
    let server = MockServer::start().await;
    mount_genres(
        &server,
        json!([{ "id": 18, "name": "Drama" }, { "id": 35, "name": "Comedy" }]),
    )
    .await;

    let state = setup_test_state().await;
    state
        .genre_service()
        .import(movie_catalog::models::GenreDto {
            external_id: Some(18),
            name: "Unknown".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let sync = MovieSync::new(client(&server), &state, options());
    let refresh = sync.refresh_genres().await.unwrap();
    assert_eq!(refresh.created, 1);
    assert_eq!(refresh.renamed, 1);

    let again = sync.refresh_genres().await.unwrap();
    assert_eq!(again.unchanged, 2);

    let drama = state
        .genre_service()
        .find_by_external_id(18)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(drama.name, "Drama");
}

async fn mount_people(server: &MockServer, page: u32, total_pages: u32, results: Value) {
    Mock::given(method("GET"))
        .and(path("/person/popular"))
        .and(query_param("api_key", "test-key"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": page,
            "results": results,
            "total_pages": total_pages,
            "total_results": 20 * total_pages
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_popular_actors_are_upserted_by_external_id() {
    let server = MockServer::start().await;
    mount_people(
        &server,
        1,
        2,
        json!([
            { "id": 1019, "name": "Mads Mikkelsen", "known_for_department": "Acting", "popularity": 30.1 },
            { "id": 8329, "name": "Susanne Bier", "known_for_department": "Directing" }
        ]),
    )
    .await;
    mount_people(
        &server,
        2,
        2,
        json!([{ "id": 77, "name": "Trine Dyrholm", "known_for_department": "Acting" }]),
    )
    .await;

    let state = setup_test_state().await;
    state
        .actor_service()
        .create(movie_catalog::models::ActorDto {
            external_id: Some(77),
            name: "Trine Dyrholm".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let sync = MovieSync::new(client(&server), &state, options());
    let import = sync.import_popular_actors().await.unwrap();
    assert_eq!(import.pages, 2);
    assert_eq!(import.created, 1);
    assert_eq!(import.known, 1);
    assert_eq!(import.skipped, 1);

    let again = sync.import_popular_actors().await.unwrap();
    assert_eq!(again.created, 0);
    assert_eq!(again.known, 2);

    let actors = state.actor_service().get_all().await.unwrap();
    assert_eq!(actors.len(), 2);
    assert!(actors.iter().any(|a| a.external_id == Some(1019)));
}

#[tokio::test]
async fn test_popular_people_error_reports_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/person/popular"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .mount(&server)
        .await;

    let state = setup_test_state().await;
    let err = MovieSync::new(client(&server), &state, options())
        .import_popular_actors()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Page {
            page: 1,
            source: SyncFailure::Tmdb(TmdbError::Api { status_code: 401, .. })
        }
    ));
}
