use catalog_core::model::{CourseId, UserProgress};
use dioxus::prelude::*;
use services::CourseDetail;
use tracing::error;

use crate::context::AppContext;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{CourseDetailVm, LessonRowVm};

/// Signals behind the completion toggle of one mounted detail view.
#[derive(Clone, Copy, PartialEq)]
pub struct ToggleState {
    /// Latest persisted record after a successful toggle.
    pub toggled: Signal<Option<UserProgress>>,
    pub saving: Signal<bool>,
}

impl ToggleState {
    /// The record to display: a toggled one wins over the loaded one.
    #[must_use]
    pub fn progress(&self, loaded: Option<UserProgress>) -> Option<UserProgress> {
        (self.toggled)().or(loaded)
    }
}

pub fn use_toggle_state() -> ToggleState {
    ToggleState {
        toggled: use_signal(|| None::<UserProgress>),
        saving: use_signal(|| false),
    }
}

/// Flips completion for `course_id`, given the record currently displayed.
/// Ignored while a previous write is in flight; a failed write leaves the
/// displayed record as it was.
pub fn build_toggle_action(
    state: ToggleState,
    course_id: CourseId,
) -> Callback<Option<UserProgress>> {
    let ctx = use_context::<AppContext>();
    let service = ctx.course_detail();
    let viewer = ctx.viewer_id();
    use_callback(move |current: Option<UserProgress>| {
        let mut saving = state.saving;
        let mut toggled = state.toggled;
        if saving() {
            return;
        }
        saving.set(true);
        let service = service.clone();
        let course_id = course_id.clone();
        let viewer = viewer.clone();
        spawn(async move {
            match service
                .toggle_completion(&course_id, &viewer, current.as_ref())
                .await
            {
                Ok(updated) => toggled.set(Some(updated)),
                Err(err) => {
                    error!(course_id = %course_id, error = %err, "failed to update completion");
                }
            }
            saving.set(false);
        });
    })
}

/// Course body, lessons and the completion toggle for one course.
///
/// Mounted fresh for each selected course, so a new id starts from loading.
#[component]
pub fn CourseDetailView(course_id: CourseId, on_back: EventHandler<()>) -> Element {
    let toggle = use_toggle_state();
    let on_toggle = build_toggle_action(toggle, course_id.clone());
    rsx! {
        CourseDetailPanel { course_id, toggle, on_toggle, on_back }
    }
}

#[component]
pub fn CourseDetailPanel(
    course_id: CourseId,
    toggle: ToggleState,
    on_toggle: Callback<Option<UserProgress>>,
    on_back: EventHandler<()>,
) -> Element {
    let ctx = use_context::<AppContext>();
    let service = ctx.course_detail();
    let viewer = ctx.viewer_id();

    let resource = use_resource(move || {
        let service = service.clone();
        let course_id = course_id.clone();
        let viewer = viewer.clone();
        async move {
            match service.load_course_data(&course_id, &viewer).await {
                Ok(detail) => detail,
                Err(err) => {
                    error!(course_id = %course_id, error = %err, "failed to load course");
                    None
                }
            }
        }
    });

    match view_state_from_resource(resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            div { class: "page",
                p { class: "loading", "Loading course..." }
            }
        },
        ViewState::Ready(None) => rsx! {
            div { class: "page not-found",
                p { "Course not found" }
                button { class: "back-link", onclick: move |_| on_back.call(()), "Back to Courses" }
            }
        },
        ViewState::Ready(Some(loaded)) => {
            let detail = CourseDetail {
                progress: toggle.progress(loaded.progress),
                ..loaded
            };
            let vm = CourseDetailVm::from_detail(&detail);
            let current = detail.progress;
            let saving = toggle.saving;

            rsx! {
                div { class: "page course-detail",
                    button { class: "back-link", onclick: move |_| on_back.call(()), "Back to Courses" }

                    img { class: "hero", src: "{vm.image_url}", alt: "{vm.title}" }

                    div { class: "badges",
                        span { class: vm.tone.badge_class(), "{vm.level}" }
                        if vm.show_completed_badge {
                            span { class: "badge badge-completed", "Completed" }
                        }
                    }

                    h1 { "{vm.title}" }
                    p { class: "description", "{vm.description}" }

                    div { class: "stats",
                        span { class: "duration", "{vm.duration}" }
                        span { class: "level", "{vm.level}" }
                        span { class: "lesson-count", "{vm.lesson_count_label}" }
                    }

                    button {
                        class: vm.button.class,
                        disabled: saving(),
                        onclick: move |_| on_toggle.call(current.clone()),
                        "{vm.button.label}"
                    }

                    section { class: "lessons",
                        h2 { "Course Lessons" }
                        if vm.lessons.is_empty() {
                            p { class: "empty", "No lessons available yet" }
                        } else {
                            ol {
                                for row in vm.lessons {
                                    LessonRow { key: "{row.id}", row: row.clone() }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn LessonRow(row: LessonRowVm) -> Element {
    rsx! {
        li { class: "lesson-row",
            span { class: "lesson-index", "{row.number}" }
            div {
                h3 { "{row.title}" }
                p { "{row.content}" }
            }
        }
    }
}
