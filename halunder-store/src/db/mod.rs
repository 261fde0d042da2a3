//! Database access layer for halunder-store
//!
//! SQLite schema and queries for texts, their extracted sentence pairs and
//! the operator list. The store is the durable owner of the corpus.

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

pub mod sentences;
pub mod texts;
pub mod users;

/// Open (or create) the corpus database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }

    // mode=rwc: create the file on first run
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect(&db_url)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    prepare(&pool).await?;
    Ok(pool)
}

/// Private in-memory database, used by tests and throwaway runs
///
/// One connection, never recycled: every SQLite `:memory:` connection is its own
/// database.
pub async fn init_in_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;

    prepare(&pool).await?;
    Ok(pool)
}

async fn prepare(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;
    create_schema(pool).await.context("Failed to create schema")?;
    Ok(())
}

/// Create tables if missing (idempotent)
async fn create_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            name TEXT PRIMARY KEY
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS texts (
            id TEXT PRIMARY KEY,
            content TEXT NOT NULL,
            language TEXT NOT NULL,
            text_type TEXT,
            source_title TEXT,
            source_author TEXT,
            source_page TEXT,
            source_date TEXT,
            proofread INTEGER NOT NULL DEFAULT 0,
            proofread_by TEXT,
            added_by TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sentences (
            id TEXT PRIMARY KEY,
            text_id TEXT REFERENCES texts(id) ON DELETE CASCADE,
            position INTEGER NOT NULL DEFAULT 0,
            halunder_text TEXT,
            german_text TEXT,
            match_confidence REAL,
            is_idiom INTEGER NOT NULL DEFAULT 0,
            reasoning TEXT,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_sentences_text_id ON sentences(text_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_creation_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("corpus.db");

        let pool = init_database(&db_path).await.expect("database should initialize");
        assert!(db_path.exists());

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(tables, vec!["sentences", "texts", "users"]);
    }

    #[tokio::test]
    async fn test_database_opens_existing() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("corpus.db");

        let first = init_database(&db_path).await;
        assert!(first.is_ok());
        drop(first);

        let second = init_database(&db_path).await;
        assert!(second.is_ok(), "Failed to reopen database: {:?}", second.err());
    }
}
