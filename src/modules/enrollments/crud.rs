use sqlx::{MySql, Pool};
use std::collections::HashMap;

pub struct EnrollmentCrud {
    pool: Pool<MySql>,
}

impl EnrollmentCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// Membership insert; a second call for the same pair is a no-op.
    pub async fn enroll(&self, user_id: &str, course_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT IGNORE INTO enrollments (user_id, course_id, enrolled_at) VALUES (?, ?, NOW())",
        )
        .bind(user_id)
        .bind(course_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_enrolled(&self, user_id: &str, course_id: &str) -> Result<bool, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM enrollments WHERE user_id = ? AND course_id = ?",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0 > 0)
    }

    pub async fn course_ids_for_user(&self, user_id: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT course_id FROM enrollments WHERE user_id = ? ORDER BY enrolled_at, course_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn course_ids_by_user(&self) -> Result<HashMap<String, Vec<String>>, sqlx::Error> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT user_id, course_id FROM enrollments ORDER BY enrolled_at, course_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
        for (user_id, course_id) in rows {
            grouped.entry(user_id).or_default().push(course_id);
        }
        Ok(grouped)
    }

    /// Makes the user's enrollments equal to `course_ids` (admin grant/revoke).
    pub async fn replace_for_user(&self, user_id: &str, course_ids: &[String]) -> Result<(), sqlx::Error> {
        let current = self.course_ids_for_user(user_id).await?;
        let mut tx = self.pool.begin().await?;

        for revoked in current.iter().filter(|id| !course_ids.contains(id)) {
            sqlx::query("DELETE FROM enrollments WHERE user_id = ? AND course_id = ?")
                .bind(user_id)
                .bind(revoked)
                .execute(&mut *tx)
                .await?;
        }

        for granted in course_ids.iter().filter(|id| !current.contains(id)) {
            sqlx::query(
                "INSERT IGNORE INTO enrollments (user_id, course_id, enrolled_at) VALUES (?, ?, NOW())",
            )
            .bind(user_id)
            .bind(granted)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
}
