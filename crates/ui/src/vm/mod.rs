mod course_vm;

pub use course_vm::{
    CompletionButtonVm, CourseCardVm, CourseDetailVm, LessonRowVm, LevelTone, map_course_cards,
    map_lesson_rows,
};
