use catalog_core::model::{Course, CourseId, Lesson, LessonId, ProgressId, UserProgress, ViewerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// JSON shape of a `courses` row.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CourseRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CourseRow {
    pub(crate) fn from_course(course: &Course) -> Self {
        Self {
            id: course.id().to_string(),
            title: course.title().to_owned(),
            description: Some(course.description().to_owned()),
            image_url: Some(course.image_url().to_owned()),
            level: Some(course.level().to_owned()),
            duration: Some(course.duration().to_owned()),
            created_at: course.created_at(),
        }
    }
}

impl TryFrom<CourseRow> for Course {
    type Error = StorageError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        Ok(Course::from_persisted(
            CourseId::from_persisted(row.id),
            row.title,
            row.description.unwrap_or_default(),
            row.image_url.unwrap_or_default(),
            row.level.unwrap_or_default(),
            row.duration.unwrap_or_default(),
            row.created_at,
        ))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct LessonRow {
    pub id: String,
    pub course_id: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    pub order: i32,
}

impl LessonRow {
    pub(crate) fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id().to_string(),
            course_id: lesson.course_id().to_string(),
            title: lesson.title().to_owned(),
            content: Some(lesson.content().to_owned()),
            order: lesson.order(),
        }
    }
}

impl TryFrom<LessonRow> for Lesson {
    type Error = StorageError;

    fn try_from(row: LessonRow) -> Result<Self, Self::Error> {
        Ok(Lesson::from_persisted(
            LessonId::from_persisted(row.id),
            CourseId::from_persisted(row.course_id),
            row.title,
            row.content.unwrap_or_default(),
            row.order,
        ))
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressRow {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProgressRow> for UserProgress {
    type Error = StorageError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        UserProgress::from_persisted(
            ProgressId::from_persisted(row.id),
            ViewerId::from_persisted(row.user_id),
            CourseId::from_persisted(row.course_id),
            row.completed,
            row.completed_at,
        )
        .map_err(ser)
    }
}

/// Body of a completion write. `completed_at` is serialized as `null` when clear.
#[derive(Debug, Serialize)]
pub(crate) struct CompletionPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<&'a str>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}
