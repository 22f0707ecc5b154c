use crate::error::{is_unique_violation, map_sqlx_error};
use async_trait::async_trait;
use permalink_core::error::StorageError;
use permalink_core::repository::{PermalinkEntry, ReadRepository, Repository, Result};
use permalink_core::PermalinkId;
use sqlx::{MySqlPool, Row};
use tracing::trace;

const SCHEMA: &str = include_str!("../ddl/mysql/permalinks.sql");

/// MySQL implementation of the repository contract.
///
/// Urls are stored as `VARBINARY` so lookups compare bytes, not collated
/// text. The unique key on `permalink` is what makes concurrent creation of
/// the same url safe; ids come from `AUTO_INCREMENT`.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
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
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn decode_url(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw)
        .map_err(|e| StorageError::InvalidData(format!("permalink is not valid utf-8: {e}")))
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, id: PermalinkId) -> Result<Option<PermalinkEntry>> {
        trace!(%id, "selecting permalink by id");

        let row = sqlx::query(
            r#"
            SELECT permalink
            FROM permalinks
            WHERE permalink_id = ?
            LIMIT 1
            "#,
        )
        .bind(id.as_u64())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let raw: Vec<u8> = row.try_get("permalink").map_err(map_sqlx_error)?;

        Ok(Some(PermalinkEntry {
            id,
            url: decode_url(raw)?,
        }))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<PermalinkId>> {
        let row = sqlx::query(
            r#"
            SELECT permalink_id
            FROM permalinks
            WHERE permalink = ?
            LIMIT 1
            "#,
        )
        .bind(url.as_bytes())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(|row| {
            row.try_get::<u64, _>("permalink_id")
                .map(PermalinkId::new)
                .map_err(map_sqlx_error)
        })
        .transpose()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, url: &str) -> Result<PermalinkId> {
        let result = sqlx::query(
            r#"
            INSERT INTO permalinks (permalink)
            VALUES (?)
            "#,
        )
        .bind(url.as_bytes())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(PermalinkId::new(done.last_insert_id())),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(url.to_owned())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
