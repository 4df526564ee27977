use catalog_core::model::{CompletionState, Course, CourseId, Lesson, LessonId, LevelKind};
use services::CourseDetail;

/// Badge color for a course level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelTone {
    Green,
    Blue,
    Orange,
    Gray,
}

impl LevelTone {
    #[must_use]
    pub fn for_level(kind: LevelKind) -> Self {
        match kind {
            LevelKind::Beginner => Self::Green,
            LevelKind::Intermediate => Self::Blue,
            LevelKind::Advanced => Self::Orange,
            LevelKind::Other => Self::Gray,
        }
    }

    #[must_use]
    pub fn badge_class(self) -> &'static str {
        match self {
            Self::Green => "badge badge-green",
            Self::Blue => "badge badge-blue",
            Self::Orange => "badge badge-orange",
            Self::Gray => "badge badge-gray",
        }
    }
}

/// One card in the catalog grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseCardVm {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub level: String,
    pub duration: String,
    pub tone: LevelTone,
}

impl CourseCardVm {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        Self {
            id: course.id().clone(),
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            image_url: course.image_url().to_owned(),
            level: course.level().to_owned(),
            duration: course.duration().to_owned(),
            tone: LevelTone::for_level(course.level_kind()),
        }
    }
}

/// Cards in catalog order.
#[must_use]
pub fn map_course_cards(courses: &[Course]) -> Vec<CourseCardVm> {
    courses.iter().map(CourseCardVm::from_course).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LessonRowVm {
    pub id: LessonId,
    /// 1-based position in the rendered list.
    pub number: usize,
    pub title: String,
    pub content: String,
}

#[must_use]
pub fn map_lesson_rows(lessons: &[Lesson]) -> Vec<LessonRowVm> {
    lessons
        .iter()
        .enumerate()
        .map(|(idx, lesson)| LessonRowVm {
            id: lesson.id().clone(),
            number: idx + 1,
            title: lesson.title().to_owned(),
            content: lesson.content().to_owned(),
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletionButtonVm {
    pub label: &'static str,
    pub class: &'static str,
}

impl CompletionButtonVm {
    #[must_use]
    pub fn for_state(state: CompletionState) -> Self {
        if state.is_complete() {
            Self {
                label: "Mark as Incomplete",
                class: "toggle toggle-incomplete",
            }
        } else {
            Self {
                label: "Mark as Completed",
                class: "toggle toggle-complete",
            }
        }
    }
}

/// Everything the detail body renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseDetailVm {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub level: String,
    pub tone: LevelTone,
    pub duration: String,
    pub lesson_count_label: String,
    pub show_completed_badge: bool,
    pub button: CompletionButtonVm,
    pub lessons: Vec<LessonRowVm>,
}

impl CourseDetailVm {
    #[must_use]
    pub fn from_detail(detail: &CourseDetail) -> Self {
        let course = &detail.course;
        let state = detail.completion();
        Self {
            title: course.title().to_owned(),
            description: course.description().to_owned(),
            image_url: course.image_url().to_owned(),
            level: course.level().to_owned(),
            tone: LevelTone::for_level(course.level_kind()),
            duration: course.duration().to_owned(),
            lesson_count_label: format!("{} Lessons", detail.lesson_count()),
            show_completed_badge: state.is_complete(),
            button: CompletionButtonVm::for_state(state),
            lessons: map_lesson_rows(&detail.lessons),
        }
    }
}
