use std::sync::Arc;

use catalog_core::model::{
    CompletionState, CompletionTransition, Course, CourseId, Lesson, UserProgress, ViewerId,
    sort_lessons,
};
use storage::repository::{CourseRepository, LessonRepository, ProgressRepository};
use tracing::{debug, warn};

use crate::Clock;
use crate::error::CourseDetailError;

/// Everything the detail view renders for one course and viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetail {
    pub course: Course,
    /// Ascending by `order`.
    pub lessons: Vec<Lesson>,
    pub progress: Option<UserProgress>,
}

impl CourseDetail {
    #[must_use]
    pub fn completion(&self) -> CompletionState {
        CompletionState::of(self.progress.as_ref())
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }
}

/// Loads a course with its lessons and the viewer's progress, and toggles completion.
#[derive(Clone)]
pub struct CourseDetailService {
    clock: Clock,
    courses: Arc<dyn CourseRepository>,
    lessons: Arc<dyn LessonRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl CourseDetailService {
    #[must_use]
    pub fn new(
        clock: Clock,
        courses: Arc<dyn CourseRepository>,
        lessons: Arc<dyn LessonRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            courses,
            lessons,
            progress,
        }
    }

    /// Fetch course, lessons and progress concurrently.
    ///
    /// Returns `Ok(None)` when no course has the given id. A failed progress
    /// read is logged and treated as no progress.
    ///
    /// # Errors
    ///
    /// Returns `CourseDetailError::Course` or `CourseDetailError::Lessons` if
    /// either of those reads fails.
    pub async fn load_course_data(
        &self,
        course_id: &CourseId,
        viewer: &ViewerId,
    ) -> Result<Option<CourseDetail>, CourseDetailError> {
        let (course, lessons, progress) = tokio::join!(
            self.courses.get_course(course_id),
            self.lessons.list_lessons(course_id),
            self.progress.find_progress(course_id, viewer),
        );

        let course = course.map_err(CourseDetailError::Course)?;
        let mut lessons = lessons.map_err(CourseDetailError::Lessons)?;
        let progress = progress.unwrap_or_else(|err| {
            warn!(course_id = %course_id, error = %err, "progress read failed, treating as unstarted");
            None
        });

        let Some(course) = course else {
            debug!(course_id = %course_id, "course not found");
            return Ok(None);
        };

        sort_lessons(&mut lessons);
        debug!(
            course_id = %course_id,
            lessons = lessons.len(),
            has_progress = progress.is_some(),
            "loaded course detail"
        );

        Ok(Some(CourseDetail {
            course,
            lessons,
            progress,
        }))
    }

    /// Flip the viewer's completion for a course and return the persisted record.
    ///
    /// With no existing record a completed row is inserted, or merged into a
    /// row created concurrently for the same viewer and course. An existing
    /// record is updated by id.
    ///
    /// # Errors
    ///
    /// Returns `CourseDetailError::Completion` if the write fails; the caller's
    /// `current` value is then still accurate.
    pub async fn toggle_completion(
        &self,
        course_id: &CourseId,
        viewer: &ViewerId,
        current: Option<&UserProgress>,
    ) -> Result<UserProgress, CourseDetailError> {
        let now = self.clock.now();
        let transition = CompletionState::of(current).toggle();
        let completed = transition.target_completed();

        let updated = match (transition, current) {
            (CompletionTransition::Start, _) | (_, None) => self
                .progress
                .upsert_completion(viewer, course_id, completed, now)
                .await
                .map_err(CourseDetailError::Completion)?,
            (_, Some(existing)) => {
                self.progress
                    .update_completion(existing.id(), completed, now)
                    .await
                    .map_err(CourseDetailError::Completion)?;
                existing.with_completion(completed, now)
            }
        };

        debug!(course_id = %course_id, ?transition, "toggled completion");
        Ok(updated)
    }
}
