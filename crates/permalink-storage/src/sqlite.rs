use crate::error::{is_unique_violation, map_sqlx_error};
use async_trait::async_trait;
use permalink_core::error::StorageError;
use permalink_core::repository::{PermalinkEntry, ReadRepository, Repository, Result};
use permalink_core::PermalinkId;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;

const SCHEMA: &str = include_str!("../ddl/sqlite/permalinks.sql");

/// SQLite implementation of the repository contract.
///
/// `permalink` uses the default `BINARY` collation, so lookups are
/// byte-exact.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (and creates, if missing) the database at `database_url`,
    /// e.g. `sqlite://permalinks.db`. Writers from other connections wait on
    /// the busy timeout instead of failing.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(map_sqlx_error)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Opens a private in-memory database with the schema already created.
    ///
    /// The pool is pinned to a single connection that is never recycled;
    /// every new connection to `sqlite::memory:` would see an empty database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await
            .map_err(map_sqlx_error)?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;
        Ok(repo)
    }

    /// Creates the `permalinks` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn to_permalink_id(raw: i64) -> Result<PermalinkId> {
    u64::try_from(raw)
        .map(PermalinkId::new)
        .map_err(|_| StorageError::InvalidData(format!("negative permalink_id {raw}")))
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, id: PermalinkId) -> Result<Option<PermalinkEntry>> {
        // SQLite rowids are signed; anything above i64::MAX was never issued.
        let Ok(key) = i64::try_from(id.as_u64()) else {
            return Ok(None);
        };

        let row = sqlx::query(
            r#"
            SELECT permalink
            FROM permalinks
            WHERE permalink_id = ?
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let url: String = row.try_get("permalink").map_err(map_sqlx_error)?;
        Ok(Some(PermalinkEntry { id, url }))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<PermalinkId>> {
        let row = sqlx::query(
            r#"
            SELECT permalink_id
            FROM permalinks
            WHERE permalink = ?
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let raw: i64 = row.try_get("permalink_id").map_err(map_sqlx_error)?;
                to_permalink_id(raw).map(Some)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, url: &str) -> Result<PermalinkId> {
        let result = sqlx::query(
            r#"
            INSERT INTO permalinks (permalink)
            VALUES (?)
            "#,
        )
        .bind(url)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => to_permalink_id(done.last_insert_rowid()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(url.to_owned())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
