use async_trait::async_trait;
use jiff::Timestamp;
use portal_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use portal_core::StorageError;
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::debug;

/// PostgreSQL implementation of the repository contract.
///
/// Backed by the single `url` table created by the bundled migrations. The
/// unique constraint on `url` is what rejects a second insert of the same
/// URL; callers see it as [`StorageError::Conflict`]. Timestamps are stored
/// as UTC wall-clock time.
#[derive(Debug, Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a repository from an existing PostgreSQL connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new PostgreSQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Operation(format!("migration failed: {e}")))
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn parse_timestamp(column: &str, micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid {column} timestamp '{micros}': {e}"))
    })
}

fn record_from_row(row: &PgRow) -> Result<UrlRecord> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let url: Option<String> = row.try_get("url").map_err(map_sqlx_error)?;
    let created_on: Option<i64> = row.try_get("created_on_us").map_err(map_sqlx_error)?;
    let modified_on: Option<i64> = row.try_get("modified_on_us").map_err(map_sqlx_error)?;

    let id = u64::try_from(id)
        .map_err(|_| StorageError::InvalidData(format!("negative record id {id}")))?;
    let url = url.ok_or_else(|| StorageError::InvalidData(format!("record {id} has no url")))?;
    let created_at = created_on
        .map(|micros| parse_timestamp("created_on", micros))
        .transpose()?
        .ok_or_else(|| StorageError::InvalidData(format!("record {id} has no created_on")))?;
    let modified_at = modified_on
        .map(|micros| parse_timestamp("modified_on", micros))
        .transpose()?;

    Ok(UrlRecord {
        id,
        url,
        created_at,
        modified_at,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for PostgresRepository {
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id,
                   url,
                   (EXTRACT(EPOCH FROM created_on) * 1000000)::BIGINT AS created_on_us,
                   (EXTRACT(EPOCH FROM modified_on) * 1000000)::BIGINT AS modified_on_us
            FROM url
            WHERE url = $1
            LIMIT 1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>> {
        // BIGSERIAL never allocates past i64::MAX.
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        let row = sqlx::query(
            r#"
            SELECT id,
                   url,
                   (EXTRACT(EPOCH FROM created_on) * 1000000)::BIGINT AS created_on_us,
                   (EXTRACT(EPOCH FROM modified_on) * 1000000)::BIGINT AS modified_on_us
            FROM url
            WHERE id = $1
            LIMIT 1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    async fn create(&self, url: &str) -> Result<UrlRecord> {
        // Dropping the transaction without commit rolls it back.
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO url (url, created_on, modified_on)
            VALUES ($1, timezone('utc', now()), NULL)
            RETURNING id,
                      url,
                      (EXTRACT(EPOCH FROM created_on) * 1000000)::BIGINT AS created_on_us,
                      (EXTRACT(EPOCH FROM modified_on) * 1000000)::BIGINT AS modified_on_us
            "#,
        )
        .bind(url)
        .fetch_one(&mut *tx)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(err) if is_unique_violation(&err) => {
                debug!(url = %url, "insert rejected by unique constraint");
                return Err(StorageError::Conflict(url.to_owned()));
            }
            Err(err) => return Err(map_sqlx_error(err)),
        };

        let record = record_from_row(&row)?;
        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(record)
    }
}
