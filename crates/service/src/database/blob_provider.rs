use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use common::prelude::{Blob, BlobId, BlobProvider, BlobProviderError, NewBlob};

use crate::database::Database;

type DbResult<T> = Result<T, BlobProviderError<sqlx::Error>>;

/// Keeps each `IN (...)` list well below SQLite's bound parameter limit
const DELETE_CHUNK_SIZE: usize = 500;

fn blob_from_row(row: &SqliteRow) -> Result<Blob, sqlx::Error> {
    let id: i64 = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let content: Vec<u8> = row.try_get("content")?;
    Ok(Blob::new(BlobId::new(id), name, content))
}

#[async_trait]
impl BlobProvider for Database {
    type Error = sqlx::Error;

    async fn insert(&self, blob: NewBlob) -> DbResult<Blob> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            INSERT INTO blobs (name, content, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&blob.name)
        .bind(&blob.content[..])
        .bind(now)
        .bind(now)
        .execute(&**self)
        .await?;

        Ok(blob.with_id(BlobId::new(result.last_insert_rowid())))
    }

    async fn update(&self, blob: Blob) -> DbResult<Blob> {
        let now = chrono::Utc::now().timestamp();

        let result = sqlx::query(
            r#"
            UPDATE blobs
            SET name = ?, content = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&blob.name)
        .bind(&blob.content[..])
        .bind(now)
        .bind(blob.id.get())
        .execute(&**self)
        .await?;

        if result.rows_affected() == 0 {
            return Err(BlobProviderError::NotFound(blob.id));
        }

        Ok(blob)
    }

    async fn get(&self, id: BlobId) -> DbResult<Option<Blob>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, content
            FROM blobs
            WHERE id = ?
            "#,
        )
        .bind(id.get())
        .fetch_optional(&**self)
        .await?;

        Ok(row.as_ref().map(blob_from_row).transpose()?)
    }

    async fn find_by_name_prefix(&self, prefix: &str) -> DbResult<Vec<Blob>> {
        if prefix.is_empty() {
            return self.list().await;
        }

        // LIKE folds ASCII case and treats % and _ as wildcards, and text
        // length() stops at the first NUL, so compare the leading bytes
        let rows = sqlx::query(
            r#"
            SELECT id, name, content
            FROM blobs
            WHERE substr(CAST(name AS BLOB), 1, ?) = ?
            ORDER BY id
            "#,
        )
        .bind(prefix.len() as i64)
        .bind(prefix.as_bytes())
        .fetch_all(&**self)
        .await?;

        Ok(rows.iter().map(blob_from_row).collect::<Result<_, _>>()?)
    }

    async fn list(&self) -> DbResult<Vec<Blob>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, content
            FROM blobs
            ORDER BY id
            "#,
        )
        .fetch_all(&**self)
        .await?;

        Ok(rows.iter().map(blob_from_row).collect::<Result<_, _>>()?)
    }

    async fn delete(&self, id: BlobId) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM blobs WHERE id = ?")
            .bind(id.get())
            .execute(&**self)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_many(&self, ids: &[BlobId]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.begin().await?;
        let mut removed = 0;
        for chunk in ids.chunks(DELETE_CHUNK_SIZE) {
            let mut query: QueryBuilder<Sqlite> =
                QueryBuilder::new("DELETE FROM blobs WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in chunk {
                separated.push_bind(id.get());
            }
            separated.push_unseparated(")");

            removed += query.build().execute(&mut *tx).await?.rows_affected();
        }
        tx.commit().await?;

        Ok(removed)
    }
}
