use catalog_core::model::{CourseId, ProgressId, UserProgress, ViewerId};
use chrono::{DateTime, Utc};

use super::SqliteRepository;
use super::mapping::{db_err, map_progress_row};
use crate::repository::{ProgressRepository, StorageError};

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn find_progress(
        &self,
        course_id: &CourseId,
        viewer_id: &ViewerId,
    ) -> Result<Option<UserProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, course_id, completed, completed_at
            FROM user_progress
            WHERE course_id = ?1 AND user_id = ?2
            ",
        )
        .bind(course_id.as_str())
        .bind(viewer_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.as_ref().map(map_progress_row).transpose()
    }

    async fn update_completion(
        &self,
        id: &ProgressId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE user_progress
            SET completed = ?2, completed_at = ?3
            WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .bind(i64::from(completed))
        .bind(completed.then_some(at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn upsert_completion(
        &self,
        viewer_id: &ViewerId,
        course_id: &CourseId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<UserProgress, StorageError> {
        // The generated id is only used when no row exists for the pair yet.
        let row = sqlx::query(
            r"
            INSERT INTO user_progress (id, user_id, course_id, completed, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id, course_id) DO UPDATE SET
                completed = excluded.completed,
                completed_at = excluded.completed_at
            RETURNING id, user_id, course_id, completed, completed_at
            ",
        )
        .bind(ProgressId::generate().as_str())
        .bind(viewer_id.as_str())
        .bind(course_id.as_str())
        .bind(i64::from(completed))
        .bind(completed.then_some(at))
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        map_progress_row(&row)
    }
}
