use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, LessonId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,
}

/// An ordered content unit belonging to exactly one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    id: LessonId,
    course_id: CourseId,
    title: String,
    content: String,
    order: i32,
}

impl Lesson {
    /// Creates a lesson.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is blank.
    pub fn new(
        id: LessonId,
        course_id: CourseId,
        title: impl Into<String>,
        content: impl Into<String>,
        order: i32,
    ) -> Result<Self, LessonError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        Ok(Self {
            id,
            course_id,
            title,
            content: content.into(),
            order,
        })
    }

    /// Rebuilds a lesson from a stored row without validating the title.
    #[must_use]
    pub fn from_persisted(
        id: LessonId,
        course_id: CourseId,
        title: String,
        content: String,
        order: i32,
    ) -> Self {
        Self {
            id,
            course_id,
            title,
            content,
            order,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Display position within the owning course.
    #[must_use]
    pub fn order(&self) -> i32 {
        self.order
    }
}

/// Sorts lessons ascending by `order`. Ties keep their incoming order.
pub fn sort_lessons(lessons: &mut [Lesson]) {
    lessons.sort_by_key(Lesson::order);
}
