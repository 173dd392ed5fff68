use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DatabaseConfig;

/// Errors from the store layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique key already taken where the API reports 409.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unique key already taken where the API reports 400.
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// True when the error is a UNIQUE or PRIMARY KEY constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        password TEXT NOT NULL,
        is_active BOOLEAN NOT NULL DEFAULT 1
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS characters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        birthdate TEXT NOT NULL,
        eyes TEXT NOT NULL,
        height INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS planets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        population INTEGER NOT NULL,
        surface TEXT NOT NULL,
        diameter INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        passengers INTEGER NOT NULL,
        length REAL NOT NULL,
        cargo_capacity INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorite_people (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        people_id INTEGER NOT NULL REFERENCES characters(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, people_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorite_planets (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        planet_id INTEGER NOT NULL REFERENCES planets(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, planet_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS favorite_vehicles (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
        PRIMARY KEY (user_id, vehicle_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS revoked_tokens (
        jti TEXT PRIMARY KEY,
        email TEXT NOT NULL,
        revoked_at TEXT NOT NULL,
        expires_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS revoked_tokens_expires_at ON revoked_tokens (expires_at)",
];

/// Open the connection pool described by `config`.
///
/// `sqlite::memory:` URLs get a pool pinned to one connection that never
/// expires, since each new in-memory connection would see an empty database.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool_options = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));
    let pool_options = if is_in_memory(&config.url) {
        pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        pool_options.max_connections(config.max_connections)
    };

    let pool = pool_options.connect_with(options).await?;
    info!("Created database pool for: {}", config.url);
    Ok(pool)
}

/// Create every table the API needs. Safe to run on each startup.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), DatabaseError> {
    for ddl in SCHEMA {
        debug!(sql = %ddl.trim(), "schema");
        sqlx::query(ddl).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

/// Pings the pool to ensure connectivity
pub async fn health_check(pool: &SqlitePool) -> Result<(), DatabaseError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
