use sqlx::{MySql, Pool};

use super::model::ActivityLog;
use super::schema::{ActivityType, ACTIVITY_READ_LIMIT};

pub struct ActivityCrud {
    pool: Pool<MySql>,
}

impl ActivityCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn append(
        &self,
        user_id: &str,
        action: &str,
        description: &str,
        log_type: ActivityType,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, action, description, log_type, created_at)
            VALUES (?, ?, ?, ?, NOW(3))
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(description)
        .bind(log_type.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Fans a notification out to every user in one statement.
    pub async fn append_for_all_users(
        &self,
        action: &str,
        description: &str,
        log_type: ActivityType,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO activity_logs (user_id, action, description, log_type, created_at)
            SELECT id, ?, ?, ?, NOW(3) FROM users
            "#,
        )
        .bind(action)
        .bind(description)
        .bind(log_type.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Newest first, capped. Notifications are kept out of the activity feed and vice versa.
    pub async fn recent_for_user(
        &self,
        user_id: &str,
        notifications: bool,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let filter = if notifications { "=" } else { "<>" };
        let sql = format!(
            "SELECT * FROM activity_logs WHERE user_id = ? AND log_type {} ? ORDER BY created_at DESC, id DESC LIMIT ?",
            filter
        );

        sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(user_id)
            .bind(ActivityType::Notification.as_str())
            .bind(ACTIVITY_READ_LIMIT as i64)
            .fetch_all(&self.pool)
            .await
    }
}
