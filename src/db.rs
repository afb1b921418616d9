//! Database connection and schema management.
//!
//! Schema migration is an explicit startup step: the process entry point
//! runs `migrate` once before serving traffic and aborts if it fails.

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Connect to the relational store.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Schema statements, applied in order. Every statement is idempotent so
/// the migration can run on each startup.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS movie_info (
        id SERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        release_year BIGINT,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        date_created TIMESTAMP NOT NULL DEFAULT now(),
        date_updated TIMESTAMP NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS user_info (
        id SERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        activation_code TEXT,
        activation_expiry_date TIMESTAMP,
        date_created TIMESTAMP NOT NULL DEFAULT now(),
        date_updated TIMESTAMP NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS rating_info (
        id SERIAL PRIMARY KEY,
        movie_info_id INTEGER NOT NULL REFERENCES movie_info(id) ON DELETE CASCADE,
        user_info_id INTEGER NOT NULL REFERENCES user_info(id) ON DELETE CASCADE,
        rating INTEGER NOT NULL,
        review TEXT,
        active BOOLEAN NOT NULL DEFAULT TRUE,
        date_created TIMESTAMP NOT NULL DEFAULT now(),
        date_updated TIMESTAMP NOT NULL DEFAULT now(),
        UNIQUE (movie_info_id, user_info_id)
    )"#,
    r#"CREATE TABLE IF NOT EXISTS rating_report (
        id SERIAL PRIMARY KEY,
        movie_info_id INTEGER NOT NULL UNIQUE REFERENCES movie_info(id) ON DELETE CASCADE,
        accumulated_rating NUMERIC(10, 2) NOT NULL,
        date_created TIMESTAMP NOT NULL DEFAULT now(),
        date_updated TIMESTAMP NOT NULL DEFAULT now()
    )"#,
    r#"CREATE INDEX IF NOT EXISTS idx_rating_info_movie ON rating_info (movie_info_id)"#,
    r#"CREATE INDEX IF NOT EXISTS idx_rating_info_user_created ON rating_info (user_info_id, date_created)"#,
];

/// Apply the schema. Safe to call repeatedly; fails fast on the first
/// statement that errors.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in SCHEMA {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }
    log::info!("schema migration complete ({} statements)", SCHEMA.len());
    Ok(())
}
