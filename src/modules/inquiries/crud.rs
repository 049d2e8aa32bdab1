use chrono::Utc;
use sqlx::{MySql, Pool};

use super::model::Inquiry;
use super::schema::{InquiryStatus, SubmitInquiryRequest};

pub struct InquiryCrud {
    pool: Pool<MySql>,
}

impl InquiryCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, id: &str, req: &SubmitInquiryRequest) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO inquiries (id, name, email, message, service_type, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(req.name.trim())
        .bind(req.email.trim())
        .bind(&req.message)
        .bind(&req.service_type)
        .bind(InquiryStatus::New.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, sqlx::Error> {
        sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn list(&self) -> Result<Vec<Inquiry>, sqlx::Error> {
        sqlx::query_as::<_, Inquiry>("SELECT * FROM inquiries ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn set_status(&self, id: &str, status: InquiryStatus) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE inquiries SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
