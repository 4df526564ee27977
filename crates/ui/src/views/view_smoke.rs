use std::sync::Arc;

use catalog_core::model::{
    Course, CourseId, Lesson, LessonId, ProgressId, UserProgress, ViewerId,
};
use catalog_core::time::fixed_now;
use chrono::{DateTime, Duration, Utc};
use storage::repository::{CourseRepository, ProgressRepository, Storage, StorageError};
use tokio::sync::Notify;

use crate::views::test_harness::{ViewKind, setup_view_harness};

fn course(id: &str, title: &str, level: &str, minutes: i64) -> Course {
    Course::new(
        CourseId::new(id).unwrap(),
        title,
        format!("About {title}"),
        format!("https://img.example.com/{id}.jpg"),
        level,
        "4 weeks",
        fixed_now() + Duration::minutes(minutes),
    )
    .unwrap()
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_renders_cards_in_creation_order() {
    let storage = Storage::in_memory();
    storage
        .courses
        .upsert_course(&course("c2", "Second Course", "Advanced", 5))
        .await
        .unwrap();
    storage
        .courses
        .upsert_course(&course("c1", "First Course", "Beginner", 0))
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Catalog, &storage);
    harness.settle().await;
    let html = harness.render();

    let first = html.find("First Course").expect("first card");
    let second = html.find("Second Course").expect("second card");
    assert!(first < second, "cards out of order in {html}");
    assert!(html.contains("badge badge-green"), "missing level badge in {html}");
    assert!(html.contains("View Course"), "missing call to action in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn empty_catalog_renders_placeholder() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Catalog, &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No courses available yet"), "missing placeholder in {html}");
    assert!(!html.contains("course-grid"), "unexpected grid in {html}");
}

struct OfflineCourses;

#[async_trait::async_trait]
impl CourseRepository for OfflineCourses {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn get_course(&self, _id: &CourseId) -> Result<Option<Course>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn upsert_course(&self, _course: &Course) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

fn offline_storage() -> Storage {
    let mut storage = Storage::in_memory();
    storage.courses = Arc::new(OfflineCourses);
    storage
}

#[tokio::test(flavor = "current_thread")]
async fn catalog_fetch_failure_renders_empty_catalog() {
    let storage = offline_storage();
    let mut harness = setup_view_harness(ViewKind::Catalog, &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No courses available yet"), "missing placeholder in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn missing_course_renders_not_found() {
    let storage = Storage::in_memory();
    let mut harness =
        setup_view_harness(ViewKind::Detail(CourseId::new("ghost").unwrap()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Course not found"), "missing not-found in {html}");
    assert!(html.contains("Back to Courses"), "missing back button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_fetch_failure_renders_not_found() {
    let storage = offline_storage();
    let mut harness = setup_view_harness(ViewKind::Detail(CourseId::new("c1").unwrap()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Course not found"), "missing not-found in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn course_without_lessons_renders_placeholder_and_zero_count() {
    let storage = Storage::in_memory();
    storage
        .courses
        .upsert_course(&course("c1", "Empty Course", "Intermediate", 0))
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Detail(CourseId::new("c1").unwrap()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("No lessons available yet"), "missing placeholder in {html}");
    assert!(html.contains("0 Lessons"), "missing lesson count in {html}");
    assert!(html.contains("Mark as Completed"), "missing toggle in {html}");
    assert!(!html.contains("badge-completed"), "unexpected completed badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn detail_lists_lessons_and_completion() {
    let storage = Storage::in_memory();
    storage
        .courses
        .upsert_course(&course("c1", "Rust Course", "Beginner", 0))
        .await
        .unwrap();
    for (id, title, order) in [("l2", "Borrowing", 2), ("l1", "Ownership", 1)] {
        let lesson = Lesson::new(
            LessonId::new(id).unwrap(),
            CourseId::new("c1").unwrap(),
            title,
            "content",
            order,
        )
        .unwrap();
        storage.lessons.upsert_lesson(&lesson).await.unwrap();
    }
    storage
        .progress
        .upsert_completion(
            &ViewerId::new("viewer-1").unwrap(),
            &CourseId::new("c1").unwrap(),
            true,
            fixed_now(),
        )
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Detail(CourseId::new("c1").unwrap()), &storage);
    harness.settle().await;
    let html = harness.render();

    let first = html.find("Ownership").expect("first lesson");
    let second = html.find("Borrowing").expect("second lesson");
    assert!(first < second, "lessons out of order in {html}");
    assert!(html.contains("2 Lessons"), "missing lesson count in {html}");
    assert!(html.contains("Mark as Incomplete"), "missing toggle label in {html}");
    assert!(html.contains("badge-completed"), "missing completed badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn other_viewers_progress_is_not_shown() {
    let storage = Storage::in_memory();
    storage
        .courses
        .upsert_course(&course("c1", "Rust Course", "Beginner", 0))
        .await
        .unwrap();
    storage
        .progress
        .upsert_completion(
            &ViewerId::new("viewer-2").unwrap(),
            &CourseId::new("c1").unwrap(),
            true,
            fixed_now(),
        )
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Detail(CourseId::new("c1").unwrap()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Mark as Completed"), "unexpected completion in {html}");
}

async fn two_course_storage() -> Storage {
    let storage = Storage::in_memory();
    storage
        .courses
        .upsert_course(&course("c1", "First Course", "Beginner", 0))
        .await
        .unwrap();
    storage
        .courses
        .upsert_course(&course("c2", "Second Course", "Advanced", 5))
        .await
        .unwrap();
    storage
}

#[tokio::test(flavor = "current_thread")]
async fn shell_starts_on_catalog_and_navigates_both_ways() {
    let storage = two_course_storage().await;
    let mut harness = setup_view_harness(ViewKind::Shell, &storage);
    harness.settle().await;

    let nav = harness.navigation();
    assert_eq!(harness.in_runtime(|| nav.selected()), None);
    let html = harness.render();
    assert!(html.contains("course-grid"), "missing catalog in {html}");
    assert!(!html.contains("Back to Courses"), "unexpected detail in {html}");

    harness.in_runtime(|| nav.select(CourseId::new("c2").unwrap()));
    harness.pump().await;
    let html = harness.render();
    assert!(html.contains("Course Lessons"), "missing detail in {html}");
    assert!(html.contains("Second Course"), "wrong course in {html}");
    assert!(!html.contains("course-grid"), "catalog still shown in {html}");

    harness.in_runtime(|| nav.back());
    harness.pump().await;
    let html = harness.render();
    assert!(html.contains("course-grid"), "missing catalog in {html}");
    assert!(!html.contains("Course Lessons"), "detail still shown in {html}");
}

struct GatedCourses {
    inner: Arc<dyn CourseRepository>,
    gated: CourseId,
    gate: Arc<Notify>,
}

#[async_trait::async_trait]
impl CourseRepository for GatedCourses {
    async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
        self.inner.list_courses().await
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        if id == &self.gated {
            self.gate.notified().await;
        }
        self.inner.get_course(id).await
    }

    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        self.inner.upsert_course(course).await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn switching_course_restarts_from_loading() {
    let mut storage = two_course_storage().await;
    let gate = Arc::new(Notify::new());
    storage.courses = Arc::new(GatedCourses {
        inner: Arc::clone(&storage.courses),
        gated: CourseId::new("c2").unwrap(),
        gate: Arc::clone(&gate),
    });

    let mut harness = setup_view_harness(ViewKind::Shell, &storage);
    harness.settle().await;
    let nav = harness.navigation();

    harness.in_runtime(|| nav.select(CourseId::new("c1").unwrap()));
    harness.pump().await;
    let html = harness.render();
    assert!(html.contains("First Course"), "missing first course in {html}");

    harness.in_runtime(|| nav.select(CourseId::new("c2").unwrap()));
    harness.pump().await;
    let html = harness.render();
    assert!(html.contains("Loading course..."), "missing loading state in {html}");
    assert!(!html.contains("First Course"), "stale course shown in {html}");

    gate.notify_one();
    harness.pump().await;
    let html = harness.render();
    assert!(html.contains("Second Course"), "missing second course in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn toggle_marks_unstarted_course_completed() {
    let storage = two_course_storage().await;
    let course_id = CourseId::new("c1").unwrap();
    let viewer = ViewerId::new("viewer-1").unwrap();

    let mut harness = setup_view_harness(ViewKind::Detail(course_id.clone()), &storage);
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Mark as Completed"), "missing toggle in {html}");

    let (state, on_toggle) = harness.toggle();
    harness.in_runtime(|| on_toggle.call(None));
    harness.pump().await;

    let html = harness.render();
    assert!(html.contains("badge-completed"), "missing completed badge in {html}");
    assert!(html.contains("Mark as Incomplete"), "label not flipped in {html}");
    assert!(!*state.saving.peek());

    let stored = storage
        .progress
        .find_progress(&course_id, &viewer)
        .await
        .unwrap()
        .expect("progress row");
    assert!(stored.is_completed());
    assert_eq!(*state.toggled.peek(), Some(stored));
}

#[tokio::test(flavor = "current_thread")]
async fn toggled_record_replaces_loaded_one() {
    let storage = two_course_storage().await;
    let course_id = CourseId::new("c1").unwrap();
    let viewer = ViewerId::new("viewer-1").unwrap();
    let loaded = storage
        .progress
        .upsert_completion(&viewer, &course_id, true, fixed_now())
        .await
        .unwrap();

    let mut harness = setup_view_harness(ViewKind::Detail(course_id.clone()), &storage);
    harness.settle().await;
    assert!(harness.render().contains("badge-completed"));

    let (_, on_toggle) = harness.toggle();
    harness.in_runtime(|| on_toggle.call(Some(loaded)));
    harness.pump().await;

    let html = harness.render();
    assert!(!html.contains("badge-completed"), "stale completed badge in {html}");
    assert!(html.contains("Mark as Completed"), "label not flipped in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn toggle_is_ignored_while_saving() {
    let storage = two_course_storage().await;
    let course_id = CourseId::new("c1").unwrap();

    let mut harness = setup_view_harness(ViewKind::Detail(course_id.clone()), &storage);
    harness.settle().await;

    let (state, on_toggle) = harness.toggle();
    harness.in_runtime(|| {
        let mut saving = state.saving;
        saving.set(true);
        on_toggle.call(None);
    });
    harness.pump().await;

    let html = harness.render();
    assert!(html.contains("disabled"), "toggle not disabled in {html}");
    assert!(!html.contains("badge-completed"), "unexpected completion in {html}");
    let stored = storage
        .progress
        .find_progress(&course_id, &ViewerId::new("viewer-1").unwrap())
        .await
        .unwrap();
    assert!(stored.is_none());
}

struct ReadOnlyProgress;

#[async_trait::async_trait]
impl ProgressRepository for ReadOnlyProgress {
    async fn find_progress(
        &self,
        _course_id: &CourseId,
        _viewer_id: &ViewerId,
    ) -> Result<Option<UserProgress>, StorageError> {
        Ok(None)
    }

    async fn update_completion(
        &self,
        _id: &ProgressId,
        _completed: bool,
        _at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }

    async fn upsert_completion(
        &self,
        _viewer_id: &ViewerId,
        _course_id: &CourseId,
        _completed: bool,
        _at: DateTime<Utc>,
    ) -> Result<UserProgress, StorageError> {
        Err(StorageError::Connection("read-only".into()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn failed_toggle_keeps_label_and_releases_button() {
    let mut storage = two_course_storage().await;
    storage.progress = Arc::new(ReadOnlyProgress);

    let mut harness = setup_view_harness(ViewKind::Detail(CourseId::new("c1").unwrap()), &storage);
    harness.settle().await;

    let (state, on_toggle) = harness.toggle();
    harness.in_runtime(|| on_toggle.call(None));
    harness.pump().await;

    let html = harness.render();
    assert!(html.contains("Mark as Completed"), "label changed in {html}");
    assert!(!html.contains("badge-completed"), "unexpected completion in {html}");
    assert!(!*state.saving.peek());
    assert!(state.toggled.peek().is_none());
}
