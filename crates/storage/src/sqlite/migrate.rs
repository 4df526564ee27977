use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::info;

use super::SqliteInitError;

async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
        .bind(version)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

async fn mark_applied(tx: &mut Transaction<'_, Sqlite>, version: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(version)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Runs the versioned migrations for the catalog schema.
///
/// Version 1 creates `courses`, `lessons` and `user_progress`. Each
/// `user_progress` row is unique per (`user_id`, `course_id`) so completion
/// writes can upsert on that pair.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
        ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS courses (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    image_url TEXT NOT NULL DEFAULT '',
                    level TEXT NOT NULL DEFAULT '',
                    duration TEXT NOT NULL DEFAULT '',
                    created_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
                CREATE TABLE IF NOT EXISTS lessons (
                    id TEXT PRIMARY KEY,
                    course_id TEXT NOT NULL,
                    title TEXT NOT NULL,
                    content TEXT NOT NULL DEFAULT '',
                    "order" INTEGER NOT NULL,
                    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
                );
            "#,
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS user_progress (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    course_id TEXT NOT NULL,
                    completed INTEGER NOT NULL CHECK (completed IN (0, 1)),
                    completed_at TEXT,
                    CHECK ((completed = 1) = (completed_at IS NOT NULL)),
                    UNIQUE (user_id, course_id),
                    FOREIGN KEY (course_id) REFERENCES courses(id) ON DELETE CASCADE
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_courses_created_at
                    ON courses (created_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
                CREATE INDEX IF NOT EXISTS idx_lessons_course_order
                    ON lessons (course_id, "order");
            "#,
        )
        .execute(&mut *tx)
        .await?;

        mark_applied(&mut tx, 1).await?;
        tx.commit().await?;
        info!(version = 1, "applied catalog schema migration");
    }

    Ok(())
}
