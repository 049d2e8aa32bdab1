use chrono::Utc;
use sqlx::{MySql, Pool};

use super::model::{User, UserStatus};
use super::schema::UpdateUserRequest;

pub struct UserCrud {
    pool: Pool<MySql>,
}

impl UserCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password_hash, role, status, balance, avatar,
                               purchased_products, auth_provider, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(&user.status)
        .bind(user.balance)
        .bind(&user.avatar)
        .bind(&user.purchased_products)
        .bind(&user.auth_provider)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    pub async fn list(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn list_ids(&self) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT id FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Overwrites every admin-editable column; last write wins.
    /// Callers check existence first: MySQL reports unchanged rows as unaffected.
    pub async fn update(&self, req: &UpdateUserRequest) -> Result<(), sqlx::Error> {
        let purchased = serde_json::to_string(&req.purchased_products)
            .unwrap_or_else(|_| "[]".to_string());

        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, email = ?, role = ?, status = ?, balance = ?, avatar = ?,
                purchased_products = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(req.role.as_str())
        .bind(req.status.as_str())
        .bind(req.balance)
        .bind(&req.avatar)
        .bind(purchased)
        .bind(Utc::now())
        .bind(&req.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_profile(
        &self,
        id: &str,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE(?, name), avatar = COALESCE(?, avatar), updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(name)
        .bind(avatar)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_status(&self, id: &str, status: UserStatus) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn update_password(&self, id: &str, password_hash: &str) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Appends a product id to the user's purchases unless already present.
    pub async fn add_purchased_product(&self, id: &str, product_id: &str) -> Result<bool, sqlx::Error> {
        let Some(user) = self.find_by_id(id).await? else {
            return Ok(false);
        };

        let mut purchased = user.purchased_product_ids();
        if purchased.iter().any(|p| p == product_id) {
            return Ok(true);
        }
        purchased.push(product_id.to_string());

        sqlx::query("UPDATE users SET purchased_products = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(&purchased).unwrap_or_else(|_| "[]".to_string()))
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(true)
    }

    /// Removes the user together with their enrollments and activity rows.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM enrollments WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM activity_logs WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
