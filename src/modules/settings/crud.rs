use chrono::Utc;
use sqlx::{MySql, Pool};

use super::model::SiteSetting;

pub struct SettingsCrud {
    pool: Pool<MySql>,
}

impl SettingsCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<SiteSetting>, sqlx::Error> {
        sqlx::query_as::<_, SiteSetting>("SELECT * FROM site_settings ORDER BY setting_key")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn upsert(&self, key: &str, value_json: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO site_settings (setting_key, value_json, updated_at)
            VALUES (?, ?, ?)
            ON DUPLICATE KEY UPDATE value_json = VALUES(value_json), updated_at = VALUES(updated_at)
            "#,
        )
        .bind(key)
        .bind(value_json)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
