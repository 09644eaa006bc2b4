use galleria_core::models::{FileTotals, KindUsage, MediaKind};
use galleria_core::AppError;
use sqlx::{PgPool, Postgres, Row};

use super::traits::StorageMetricsRepositoryTrait;

/// Storage accounting queries over the metadata store
#[derive(Clone)]
pub struct StorageMetricsRepository {
    pool: PgPool,
}

impl StorageMetricsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl StorageMetricsRepositoryTrait for StorageMetricsRepository {
    /// Aggregate counts and bytes per media kind. Trashed files still occupy remote
    /// storage, so they are counted.
    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "aggregate"))]
    async fn file_totals(&self) -> Result<FileTotals, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT kind, COUNT(*)::BIGINT AS count, (COALESCE(SUM(size_bytes), 0))::BIGINT AS total_bytes
            FROM files
            GROUP BY kind
            ORDER BY kind
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut totals = FileTotals::default();
        for row in rows {
            let kind: MediaKind = row.get("kind");
            let count: i64 = row.get("count");
            let bytes: i64 = row.get("total_bytes");
            totals.file_count += count;
            totals.bytes += bytes;
            totals.by_kind.push(KindUsage {
                kind,
                file_count: count,
                bytes,
            });
        }

        Ok(totals)
    }

    #[tracing::instrument(skip(self), fields(db.operation = "pg_database_size"))]
    async fn database_size(&self) -> Result<Option<i64>, AppError> {
        let result = sqlx::query_scalar::<Postgres, i64>(
            "SELECT pg_database_size(current_database())::BIGINT",
        )
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(size) => Ok(Some(size)),
            Err(e) => {
                let err = AppError::from(e);
                if err.is_insufficient_privilege() {
                    tracing::warn!("Database size unavailable: insufficient privilege");
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }

    #[tracing::instrument(skip(self), fields(db.operation = "ping"))]
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
