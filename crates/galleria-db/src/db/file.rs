use galleria_core::models::{FileFilter, FileRecord, NewFileRecord, Page};
use galleria_core::AppError;
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::traits::{FileRepositoryTrait, FileScope};

const FILE_COLUMNS: &str = "id, file_handle, thumbnail_handle, caption, kind, content_type, \
     file_name, size_bytes, remote_message_id, created_at, deleted_at";

/// Repository for the `files` table
#[derive(Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so a caption search is a plain substring match.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Append the WHERE clause shared by the count and page queries.
fn push_conditions(qb: &mut QueryBuilder<'_, Postgres>, filter: &FileFilter, scope: FileScope) {
    match scope {
        FileScope::Active => qb.push(" WHERE deleted_at IS NULL"),
        FileScope::Trashed => qb.push(" WHERE deleted_at IS NOT NULL"),
    };

    if let Some(ref caption) = filter.caption {
        qb.push(" AND caption ILIKE ").push_bind(like_pattern(caption));
    }
    if let Some(kind) = filter.kind {
        qb.push(" AND kind = ").push_bind(kind);
    }
    if let Some(from) = filter.from {
        qb.push(" AND created_at >= ").push_bind(from);
    }
    if let Some(to) = filter.to {
        qb.push(" AND created_at <= ").push_bind(to);
    }
    if let Some(album_id) = filter.album_id {
        qb.push(" AND EXISTS (SELECT 1 FROM file_albums fa WHERE fa.file_id = files.id AND fa.album_id = ")
            .push_bind(album_id)
            .push(")");
    }
}

#[async_trait::async_trait]
impl FileRepositoryTrait for FileRepository {
    #[tracing::instrument(skip(self, new), fields(db.table = "files", db.operation = "insert", file.kind = %new.kind))]
    async fn create(&self, new: NewFileRecord) -> Result<FileRecord, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            r#"
            INSERT INTO files (
                file_handle, thumbnail_handle, caption, kind, content_type,
                file_name, size_bytes, remote_message_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(&new.file_handle)
        .bind(&new.thumbnail_handle)
        .bind(&new.caption)
        .bind(new.kind)
        .bind(&new.content_type)
        .bind(&new.file_name)
        .bind(new.size_bytes)
        .bind(new.remote_message_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self, handle), fields(db.table = "files", db.operation = "select"))]
    async fn find_by_handle(&self, handle: &str) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE file_handle = $1 OR thumbnail_handle = $1 LIMIT 1"
        ))
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self, filter), fields(db.table = "files", db.operation = "select_list", scope = ?scope))]
    async fn list(
        &self,
        filter: &FileFilter,
        scope: FileScope,
    ) -> Result<Page<FileRecord>, AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM files");
        push_conditions(&mut count_query, filter, scope);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query =
            QueryBuilder::<Postgres>::new(format!("SELECT {FILE_COLUMNS} FROM files"));
        push_conditions(&mut page_query, filter, scope);
        let order_by = match scope {
            FileScope::Active => filter.sort.order_by(),
            FileScope::Trashed => "deleted_at DESC, id DESC",
        };
        page_query
            .push(" ORDER BY ")
            .push(order_by)
            .push(" LIMIT ")
            .push_bind(filter.per_page)
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let items = page_query
            .build_query_as::<FileRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(items, total, filter.page, filter.per_page))
    }

    #[tracing::instrument(skip(self, caption), fields(db.table = "files", db.operation = "update", db.record_id = %id))]
    async fn update_caption(
        &self,
        id: i64,
        caption: &str,
    ) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "UPDATE files SET caption = $2 WHERE id = $1 RETURNING {FILE_COLUMNS}"
        ))
        .bind(id)
        .bind(caption)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "soft_delete", db.record_id = %id))]
    async fn trash(&self, id: i64) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE files SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
                .bind(id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "files", db.operation = "soft_delete_batch", count = ids.len()))]
    async fn trash_many(&self, ids: &[i64]) -> Result<u64, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            "UPDATE files SET deleted_at = NOW() WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(ids)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "restore", db.record_id = %id))]
    async fn restore(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            r#"
            UPDATE files SET deleted_at = NULL
            WHERE id = $1 AND deleted_at IS NOT NULL
            RETURNING {FILE_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete", db.record_id = %id))]
    async fn purge(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "DELETE FROM files WHERE id = $1 AND deleted_at IS NOT NULL RETURNING {FILE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "delete", db.record_id = %id))]
    async fn hard_delete(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        let record = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "DELETE FROM files WHERE id = $1 RETURNING {FILE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "files", db.operation = "select"))]
    async fn list_all_trashed(&self) -> Result<Vec<FileRecord>, AppError> {
        let records = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE deleted_at IS NOT NULL ORDER BY deleted_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    #[tracing::instrument(skip(self, ids), fields(db.table = "files", db.operation = "delete_batch", count = ids.len()))]
    async fn purge_many(&self, ids: &[i64]) -> Result<Vec<FileRecord>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = sqlx::query_as::<Postgres, FileRecord>(&format!(
            "DELETE FROM files WHERE id = ANY($1) AND deleted_at IS NOT NULL RETURNING {FILE_COLUMNS}"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
