use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{Sqlite, SqlitePool},
    Pool,
};

pub type DbPool = Pool<Sqlite>;

/// Turns a map config string into an sqlx URL. Bare paths are accepted.
pub fn database_url(config: &str) -> String {
    if config.starts_with("sqlite:") {
        config.to_owned()
    } else {
        format!("sqlite://{}", config)
    }
}

pub async fn ensure_database_file(url: &str) -> Result<(), sqlx::Error> {
    let exists = Sqlite::database_exists(url).await?;

    if !exists {
        Sqlite::create_database(url).await?;
    }

    Ok(())
}

/// Connects to an existing database. A missing file is an error.
pub async fn connect(url: &str) -> Result<DbPool, sqlx::Error> {
    let pool = SqlitePool::connect(url).await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

/// Connects, creating the database file first when it does not exist.
pub async fn init_pool(url: &str) -> Result<DbPool, sqlx::Error> {
    ensure_database_file(url).await?;
    connect(url).await
}

async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL DEFAULT '',
            updated INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
