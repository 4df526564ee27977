use catalog_core::model::{Course, CourseId};

use super::SqliteRepository;
use super::mapping::{db_err, map_course_row};
use crate::repository::{CourseRepository, StorageError};

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, description, image_url, level, duration, created_at
            FROM courses
            ORDER BY created_at ASC, rowid ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_course_row).collect()
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, description, image_url, level, duration, created_at
            FROM courses WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_course_row).transpose()
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO courses (id, title, description, image_url, level, duration, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                image_url = excluded.image_url,
                level = excluded.level,
                duration = excluded.duration
            ",
        )
        .bind(course.id().as_str())
        .bind(course.title())
        .bind(course.description())
        .bind(course.image_url())
        .bind(course.level())
        .bind(course.duration())
        .bind(course.created_at())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
