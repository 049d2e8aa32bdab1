use chrono::Utc;
use sqlx::{MySql, Pool, QueryBuilder};

use super::model::Course;
use super::schema::CourseInput;

pub struct CourseCrud {
    pool: Pool<MySql>,
}

impl CourseCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Course>, sqlx::Error> {
        sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Subset of `ids` that name existing courses.
    pub async fn existing_ids(&self, ids: &[String]) -> Result<Vec<String>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<MySql>::new("SELECT id FROM courses WHERE id IN (");
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        separated.push_unseparated(")");

        let rows: Vec<(String,)> = query.build_query_as::<(String,)>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn create(&self, id: &str, input: &CourseInput, modules_json: &str) -> Result<(), sqlx::Error> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO courses (id, title, description, thumbnail, level, duration, instructor,
                                 price, modules_json, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.thumbnail)
        .bind(&input.level)
        .bind(&input.duration)
        .bind(&input.instructor)
        .bind(input.price)
        .bind(modules_json)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update(&self, id: &str, input: &CourseInput, modules_json: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE courses
            SET title = ?, description = ?, thumbnail = ?, level = ?, duration = ?,
                instructor = ?, price = ?, modules_json = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.thumbnail)
        .bind(&input.level)
        .bind(&input.duration)
        .bind(&input.instructor)
        .bind(input.price)
        .bind(modules_json)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Enrollments go first so no membership outlives its course.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM enrollments WHERE course_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM courses WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
