use chrono::Utc;
use sqlx::{MySql, Pool};

use super::model::Product;
use super::schema::ProductInput;

pub struct ProductCrud {
    pool: Pool<MySql>,
}

impl ProductCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(&self, id: &str, input: &ProductInput) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO products (id, title, description, category, price, image_url,
                                  preview_url, download_url, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.category.as_str())
        .bind(input.price)
        .bind(&input.image_url)
        .bind(&input.preview_url)
        .bind(&input.download_url)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, id: &str, input: &ProductInput) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE products
            SET title = ?, description = ?, category = ?, price = ?, image_url = ?,
                preview_url = ?, download_url = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.category.as_str())
        .bind(input.price)
        .bind(&input.image_url)
        .bind(&input.preview_url)
        .bind(&input.download_url)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
