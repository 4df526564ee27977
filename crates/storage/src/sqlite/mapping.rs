use catalog_core::model::{Course, CourseId, Lesson, LessonId, ProgressId, UserProgress, ViewerId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Constraint violations are conflicts; anything else is a connection problem.
pub(crate) fn db_err(err: sqlx::Error) -> StorageError {
    match &err {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_foreign_key_violation()
                || db.is_check_violation() =>
        {
            StorageError::Conflict(db.message().to_owned())
        }
        _ => StorageError::Connection(err.to_string()),
    }
}

// Catalog rows are written outside this system and taken as stored.
pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    Ok(Course::from_persisted(
        CourseId::from_persisted(row.try_get::<String, _>("id").map_err(ser)?),
        row.try_get("title").map_err(ser)?,
        row.try_get("description").map_err(ser)?,
        row.try_get("image_url").map_err(ser)?,
        row.try_get("level").map_err(ser)?,
        row.try_get("duration").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    ))
}

pub(crate) fn map_lesson_row(row: &SqliteRow) -> Result<Lesson, StorageError> {
    let order: i64 = row.try_get("order").map_err(ser)?;
    let order = i32::try_from(order)
        .map_err(|_| StorageError::Serialization(format!("invalid lesson order: {order}")))?;

    Ok(Lesson::from_persisted(
        LessonId::from_persisted(row.try_get::<String, _>("id").map_err(ser)?),
        CourseId::from_persisted(row.try_get::<String, _>("course_id").map_err(ser)?),
        row.try_get("title").map_err(ser)?,
        row.try_get("content").map_err(ser)?,
        order,
    ))
}

pub(crate) fn map_progress_row(row: &SqliteRow) -> Result<UserProgress, StorageError> {
    UserProgress::from_persisted(
        ProgressId::from_persisted(row.try_get::<String, _>("id").map_err(ser)?),
        ViewerId::from_persisted(row.try_get::<String, _>("user_id").map_err(ser)?),
        CourseId::from_persisted(row.try_get::<String, _>("course_id").map_err(ser)?),
        row.try_get::<i64, _>("completed").map_err(ser)? != 0,
        row.try_get("completed_at").map_err(ser)?,
    )
    .map_err(ser)
}
