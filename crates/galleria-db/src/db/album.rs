use std::collections::HashMap;

use galleria_core::models::{Album, AlbumResponse, AlbumSummary};
use galleria_core::AppError;
use sqlx::{PgPool, Postgres, Row};

use super::traits::AlbumRepositoryTrait;

/// Album columns plus the count of active linked files.
const ALBUM_WITH_COUNT: &str = r#"
    SELECT a.id, a.name, a.description, a.created_at,
           COUNT(f.id) FILTER (WHERE f.deleted_at IS NULL) AS file_count
    FROM albums a
    LEFT JOIN file_albums fa ON fa.album_id = a.id
    LEFT JOIN files f ON f.id = fa.file_id
"#;

/// Repository for the `albums` and `file_albums` tables
#[derive(Clone)]
pub struct AlbumRepository {
    pool: PgPool,
}

impl AlbumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl AlbumRepositoryTrait for AlbumRepository {
    #[tracing::instrument(skip(self, description), fields(db.table = "albums", db.operation = "insert"))]
    async fn create(&self, name: &str, description: Option<&str>) -> Result<Album, AppError> {
        let album = sqlx::query_as::<Postgres, Album>(
            r#"
            INSERT INTO albums (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;

        Ok(album)
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: i64) -> Result<Option<AlbumResponse>, AppError> {
        let album = sqlx::query_as::<Postgres, AlbumResponse>(&format!(
            "{ALBUM_WITH_COUNT} WHERE a.id = $1 GROUP BY a.id"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(album)
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "select_list"))]
    async fn list(&self) -> Result<Vec<AlbumResponse>, AppError> {
        let albums = sqlx::query_as::<Postgres, AlbumResponse>(&format!(
            "{ALBUM_WITH_COUNT} GROUP BY a.id ORDER BY a.created_at DESC, a.id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(albums)
    }

    #[tracing::instrument(skip(self, name, description), fields(db.table = "albums", db.operation = "update", db.record_id = %id))]
    async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<Option<&str>>,
    ) -> Result<Option<AlbumResponse>, AppError> {
        // $3 distinguishes "leave description alone" from "set it, possibly to NULL"
        let updated = sqlx::query(
            r#"
            UPDATE albums
            SET name = COALESCE($2::TEXT, name),
                description = CASE WHEN $3::BOOLEAN THEN $4::TEXT ELSE description END
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description.is_some())
        .bind(description.flatten())
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        self.get(id).await
    }

    #[tracing::instrument(skip(self), fields(db.table = "albums", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        // Links go with the album through ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM albums WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_albums", db.operation = "insert"))]
    async fn link(&self, file_id: i64, album_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO file_albums (file_id, album_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(file_id)
        .bind(album_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "file_albums", db.operation = "delete"))]
    async fn unlink(&self, file_id: i64, album_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM file_albums WHERE file_id = $1 AND album_id = $2")
            .bind(file_id)
            .bind(album_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, album_ids), fields(db.table = "file_albums", db.operation = "insert_batch", count = album_ids.len()))]
    async fn link_many(&self, file_id: i64, album_ids: &[i64]) -> Result<u64, AppError> {
        if album_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO file_albums (file_id, album_id)
            SELECT $1, album_id FROM UNNEST($2::BIGINT[]) AS album_id
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(file_id)
        .bind(album_ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self, album_ids), fields(db.table = "file_albums", db.operation = "replace", count = album_ids.len()))]
    async fn set_links(&self, file_id: i64, album_ids: &[i64]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM file_albums WHERE file_id = $1 AND album_id <> ALL($2)")
            .bind(file_id)
            .bind(album_ids)
            .execute(&mut *tx)
            .await?;

        if !album_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO file_albums (file_id, album_id)
                SELECT $1, album_id FROM UNNEST($2::BIGINT[]) AS album_id
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(file_id)
            .bind(album_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip(self, file_ids), fields(db.table = "file_albums", db.operation = "select", count = file_ids.len()))]
    async fn albums_for_files(
        &self,
        file_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<AlbumSummary>>, AppError> {
        if file_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT fa.file_id, a.id, a.name
            FROM file_albums fa
            JOIN albums a ON a.id = fa.album_id
            WHERE fa.file_id = ANY($1)
            ORDER BY a.name ASC, a.id ASC
            "#,
        )
        .bind(file_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut result: HashMap<i64, Vec<AlbumSummary>> = HashMap::new();
        for row in rows {
            let file_id: i64 = row.get("file_id");
            result.entry(file_id).or_default().push(AlbumSummary {
                id: row.get("id"),
                name: row.get("name"),
            });
        }

        Ok(result)
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "albums", db.operation = "select", count = ids.len()))]
    async fn existing_ids(&self, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let existing = sqlx::query_scalar::<Postgres, i64>("SELECT id FROM albums WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(existing)
    }
}
