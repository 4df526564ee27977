use async_trait::async_trait;
use catalog_core::model::{Course, CourseId, Lesson, ProgressId, UserProgress, ViewerId};
use chrono::{DateTime, Utc};
use reqwest::Method;

use super::rows::{CompletionPatch, CourseRow, LessonRow, ProgressRow};
use super::{RestRepository, at_most_one, check_status, fetch_rows, transport};
use crate::repository::{CourseRepository, LessonRepository, ProgressRepository, StorageError};

const RETURN_ROWS: &str = "return=representation";
const MERGE_AND_RETURN: &str = "resolution=merge-duplicates,return=representation";

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn lessons_query(course_id: &CourseId) -> [(&'static str, String); 3] {
    [
        ("select", "*".to_owned()),
        ("course_id", eq(course_id.as_str())),
        ("order", "order.asc".to_owned()),
    ]
}

#[async_trait]
impl CourseRepository for RestRepository {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let req = self
            .request(Method::GET, "courses")
            .query(&[("select", "*"), ("order", "created_at.asc")]);
        let rows: Vec<CourseRow> = fetch_rows(req).await?;
        rows.into_iter().map(Course::try_from).collect()
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let req = self
            .request(Method::GET, "courses")
            .query(&[("select", "*".to_owned()), ("id", eq(id.as_str()))]);
        let rows: Vec<CourseRow> = fetch_rows(req).await?;
        at_most_one(rows, "course")?.map(Course::try_from).transpose()
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let resp = self
            .request(Method::POST, "courses")
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&CourseRow::from_course(course))
            .send()
            .await
            .map_err(transport)?;
        check_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl LessonRepository for RestRepository {
    async fn list_lessons(&self, course_id: &CourseId) -> Result<Vec<Lesson>, StorageError> {
        let req = self
            .request(Method::GET, "lessons")
            .query(&lessons_query(course_id));
        let rows: Vec<LessonRow> = fetch_rows(req).await?;
        rows.into_iter().map(Lesson::try_from).collect()
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let resp = self
            .request(Method::POST, "lessons")
            .query(&[("on_conflict", "id")])
            .header("Prefer", "resolution=merge-duplicates")
            .json(&LessonRow::from_lesson(lesson))
            .send()
            .await
            .map_err(transport)?;
        check_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for RestRepository {
    async fn find_progress(
        &self,
        course_id: &CourseId,
        viewer_id: &ViewerId,
    ) -> Result<Option<UserProgress>, StorageError> {
        let req = self.request(Method::GET, "user_progress").query(&[
            ("select", "*".to_owned()),
            ("course_id", eq(course_id.as_str())),
            ("user_id", eq(viewer_id.as_str())),
        ]);
        let rows: Vec<ProgressRow> = fetch_rows(req).await?;
        at_most_one(rows, "progress row")?
            .map(UserProgress::try_from)
            .transpose()
    }

    async fn update_completion(
        &self,
        id: &ProgressId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let req = self
            .request(Method::PATCH, "user_progress")
            .query(&[("id", eq(id.as_str()))])
            .header("Prefer", RETURN_ROWS)
            .json(&CompletionPatch {
                user_id: None,
                course_id: None,
                completed,
                completed_at: completed.then_some(at),
            });
        let rows: Vec<ProgressRow> = fetch_rows(req).await?;
        if rows.is_empty() {
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
        let req = self
            .request(Method::POST, "user_progress")
            .query(&[("on_conflict", "user_id,course_id")])
            .header("Prefer", MERGE_AND_RETURN)
            .json(&CompletionPatch {
                user_id: Some(viewer_id.as_str()),
                course_id: Some(course_id.as_str()),
                completed,
                completed_at: completed.then_some(at),
            });
        let rows: Vec<ProgressRow> = fetch_rows(req).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Serialization("upsert returned no row".into()))?;
        UserProgress::try_from(row)
    }
}
