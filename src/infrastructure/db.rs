use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    run_migrations(&db).await?;

    tracing::debug!("database ready at {}", database_url);
    Ok(db)
}

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS directors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        external_id INTEGER UNIQUE,
        name TEXT NOT NULL,
        age INTEGER,
        job TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS actors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        external_id INTEGER UNIQUE,
        name TEXT NOT NULL,
        age INTEGER,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        external_id INTEGER UNIQUE,
        name TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        external_id INTEGER UNIQUE,
        title TEXT NOT NULL,
        release_date TEXT,
        original_language TEXT,
        rating REAL,
        director_id INTEGER REFERENCES directors(id) ON DELETE SET NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_movies_director ON movies(director_id)",
    "CREATE INDEX IF NOT EXISTS idx_movies_title_release ON movies(title, release_date)",
    r#"
    CREATE TABLE IF NOT EXISTS movie_genres (
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        genre_id INTEGER NOT NULL REFERENCES genres(id) ON DELETE CASCADE,
        PRIMARY KEY (movie_id, genre_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movie_actors (
        movie_id INTEGER NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        actor_id INTEGER NOT NULL REFERENCES actors(id) ON DELETE CASCADE,
        PRIMARY KEY (movie_id, actor_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS actor_directors (
        actor_id INTEGER NOT NULL REFERENCES actors(id) ON DELETE CASCADE,
        director_id INTEGER NOT NULL REFERENCES directors(id) ON DELETE CASCADE,
        PRIMARY KEY (actor_id, director_id)
    )
    "#,
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in MIGRATIONS {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }
    Ok(())
}
