use async_trait::async_trait;
use catalog_core::model::{
    Course, CourseId, Lesson, ProgressId, UserProgress, ViewerId, sort_lessons,
};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Read access to the course catalog, plus the write path used by seeding.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// List every course, oldest `created_at` first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the courses cannot be read.
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError>;

    /// Fetch a course by ID. A missing course is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the read fails.
    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError>;

    /// Persist or replace a course.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the course cannot be stored.
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError>;
}

#[async_trait]
pub trait LessonRepository: Send + Sync {
    /// List lessons of a course ascending by `order`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lessons cannot be read.
    async fn list_lessons(&self, course_id: &CourseId) -> Result<Vec<Lesson>, StorageError>;

    /// Persist or replace a lesson.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the lesson cannot be stored.
    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError>;
}

/// Completion records, scoped by viewer.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Find the record for a (course, viewer) pair, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if more than one row matches, or other
    /// storage errors.
    async fn find_progress(
        &self,
        course_id: &CourseId,
        viewer_id: &ViewerId,
    ) -> Result<Option<UserProgress>, StorageError>;

    /// Set the completion flag of an existing row. `completed_at` is stored
    /// only when `completed` is true.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no row has this ID.
    async fn update_completion(
        &self,
        id: &ProgressId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Insert the row for a (viewer, course) pair, or update it if one already
    /// exists, in a single atomic step. Returns the stored row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn upsert_completion(
        &self,
        viewer_id: &ViewerId,
        course_id: &CourseId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<UserProgress, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    courses: Arc<Mutex<Vec<Course>>>,
    lessons: Arc<Mutex<Vec<Lesson>>>,
    progress: Arc<Mutex<HashMap<ProgressId, UserProgress>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of progress rows currently stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn progress_row_count(&self) -> Result<usize, StorageError> {
        Ok(lock(&self.progress)?.len())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Connection(e.to_string()))
}

#[async_trait]
impl CourseRepository for InMemoryRepository {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        let mut courses = lock(&self.courses)?.clone();
        courses.sort_by_key(Course::created_at);
        Ok(courses)
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let guard = lock(&self.courses)?;
        Ok(guard.iter().find(|c| c.id() == id).cloned())
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let mut guard = lock(&self.courses)?;
        match guard.iter_mut().find(|c| c.id() == course.id()) {
            Some(existing) => *existing = course.clone(),
            None => guard.push(course.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl LessonRepository for InMemoryRepository {
    async fn list_lessons(&self, course_id: &CourseId) -> Result<Vec<Lesson>, StorageError> {
        let guard = lock(&self.lessons)?;
        let mut lessons: Vec<Lesson> = guard
            .iter()
            .filter(|l| l.course_id() == course_id)
            .cloned()
            .collect();
        sort_lessons(&mut lessons);
        Ok(lessons)
    }

    async fn upsert_lesson(&self, lesson: &Lesson) -> Result<(), StorageError> {
        let mut guard = lock(&self.lessons)?;
        match guard.iter_mut().find(|l| l.id() == lesson.id()) {
            Some(existing) => *existing = lesson.clone(),
            None => guard.push(lesson.clone()),
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn find_progress(
        &self,
        course_id: &CourseId,
        viewer_id: &ViewerId,
    ) -> Result<Option<UserProgress>, StorageError> {
        let guard = lock(&self.progress)?;
        let mut matches = guard
            .values()
            .filter(|p| p.course_id() == course_id && p.viewer_id() == viewer_id);
        let first = matches.next().cloned();
        if matches.next().is_some() {
            return Err(StorageError::Conflict(format!(
                "multiple progress rows for course {course_id}"
            )));
        }
        Ok(first)
    }

    async fn update_completion(
        &self,
        id: &ProgressId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = lock(&self.progress)?;
        let row = guard.get_mut(id).ok_or(StorageError::NotFound)?;
        *row = row.with_completion(completed, at);
        Ok(())
    }

    async fn upsert_completion(
        &self,
        viewer_id: &ViewerId,
        course_id: &CourseId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Result<UserProgress, StorageError> {
        let mut guard = lock(&self.progress)?;
        let existing = guard
            .values_mut()
            .find(|p| p.course_id() == course_id && p.viewer_id() == viewer_id);
        let stored = match existing {
            Some(row) => {
                *row = row.with_completion(completed, at);
                row.clone()
            }
            None => {
                let row = UserProgress::new(
                    ProgressId::generate(),
                    viewer_id.clone(),
                    course_id.clone(),
                    completed,
                    at,
                );
                guard.insert(row.id().clone(), row.clone());
                row
            }
        };
        Ok(stored)
    }
}

/// Aggregates the catalog repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub courses: Arc<dyn CourseRepository>,
    pub lessons: Arc<dyn LessonRepository>,
    pub progress: Arc<dyn ProgressRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Share one repository value across all three handles.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: CourseRepository + LessonRepository + ProgressRepository + Clone + 'static,
    {
        let courses: Arc<dyn CourseRepository> = Arc::new(repo.clone());
        let lessons: Arc<dyn LessonRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo);
        Self {
            courses,
            lessons,
            progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::model::LessonId;
    use catalog_core::time::fixed_now;
    use chrono::Duration;

    fn course(id: &str, minutes: i64) -> Course {
        Course::new(
            CourseId::new(id).unwrap(),
            format!("Course {id}"),
            "desc",
            "img.png",
            "beginner",
            "1 week",
            fixed_now() + Duration::minutes(minutes),
        )
        .unwrap()
    }

    fn lesson(id: &str, course: &str, order: i32) -> Lesson {
        Lesson::new(
            LessonId::new(id).unwrap(),
            CourseId::new(course).unwrap(),
            format!("Lesson {id}"),
            "body",
            order,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lists_courses_by_creation_time() {
        let repo = InMemoryRepository::new();
        repo.upsert_course(&course("late", 10)).await.unwrap();
        repo.upsert_course(&course("early", 0)).await.unwrap();

        let listed = repo.list_courses().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, ["early", "late"]);
    }

    #[tokio::test]
    async fn missing_course_is_none() {
        let repo = InMemoryRepository::new();
        let found = repo
            .get_course(&CourseId::new("nope").unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn lessons_are_scoped_and_ordered() {
        let repo = InMemoryRepository::new();
        repo.upsert_lesson(&lesson("l2", "c1", 2)).await.unwrap();
        repo.upsert_lesson(&lesson("other", "c2", 0)).await.unwrap();
        repo.upsert_lesson(&lesson("l1", "c1", 1)).await.unwrap();

        let lessons = repo
            .list_lessons(&CourseId::new("c1").unwrap())
            .await
            .unwrap();
        let ids: Vec<&str> = lessons.iter().map(|l| l.id().as_str()).collect();
        assert_eq!(ids, ["l1", "l2"]);
    }

    #[tokio::test]
    async fn upsert_completion_keeps_one_row_per_pair() {
        let repo = InMemoryRepository::new();
        let viewer = ViewerId::new("v1").unwrap();
        let course = CourseId::new("c1").unwrap();

        let first = repo
            .upsert_completion(&viewer, &course, true, fixed_now())
            .await
            .unwrap();
        let second = repo
            .upsert_completion(&viewer, &course, true, fixed_now())
            .await
            .unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(repo.progress_row_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn update_completion_of_unknown_row_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = repo
            .update_completion(&ProgressId::new("ghost").unwrap(), true, fixed_now())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
