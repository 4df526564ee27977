mod course;
mod ids;
mod lesson;
mod progress;

pub use ids::{CourseId, LessonId, ParseIdError, ProgressId, ViewerId};

pub use course::{Course, CourseError, LevelKind};
pub use lesson::{Lesson, LessonError, sort_lessons};
pub use progress::{CompletionState, CompletionTransition, ProgressError, UserProgress};
