use catalog_core::model::{CourseId, Lesson};

use super::SqliteRepository;
use super::mapping::{db_err, map_lesson_row};
use crate::repository::{LessonRepository, StorageError};

#[async_trait::async_trait]
impl LessonRepository for SqliteRepository {
    async fn list_lessons(&self, course_id: &CourseId) -> Result<Vec<Lesson>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT id, course_id, title, content, "order"
            FROM lessons
            WHERE course_id = ?1
            ORDER BY "order" ASC, rowid ASC
            "#,
        )
        .bind(course_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(map_lesson_row).collect()
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO lessons (id, course_id, title, content, "order")
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                course_id = excluded.course_id,
                title = excluded.title,
                content = excluded.content,
                "order" = excluded."order"
            "#,
        )
        .bind(lesson.id().as_str())
        .bind(lesson.course_id().as_str())
        .bind(lesson.title())
        .bind(lesson.content())
        .bind(i64::from(lesson.order()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }
}
