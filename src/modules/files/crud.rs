use chrono::Utc;
use sqlx::{MySql, Pool};

use super::model::{HostedFile, HostedFileMeta};

pub struct FileCrud {
    pool: Pool<MySql>,
}

impl FileCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        id: &str,
        name: &str,
        mime_type: &str,
        size_bytes: usize,
        data_url: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO hosted_files (id, name, mime_type, size_bytes, data_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(mime_type)
        .bind(size_bytes as i64)
        .bind(data_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<HostedFile>, sqlx::Error> {
        sqlx::query_as::<_, HostedFile>("SELECT * FROM hosted_files WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_meta(&self, id: &str) -> Result<Option<HostedFileMeta>, sqlx::Error> {
        sqlx::query_as::<_, HostedFileMeta>(
            "SELECT id, name, mime_type, size_bytes, created_at FROM hosted_files WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn list(&self) -> Result<Vec<HostedFileMeta>, sqlx::Error> {
        sqlx::query_as::<_, HostedFileMeta>(
            "SELECT id, name, mime_type, size_bytes, created_at FROM hosted_files ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hosted_files WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
