use catalog_core::model::CourseId;
use dioxus::prelude::*;

use crate::views::{CatalogView, CourseDetailView};

/// The shell's only state: the course being viewed, or `None` for the catalog.
#[derive(Clone, Copy, PartialEq)]
pub struct Navigation {
    selected: Signal<Option<CourseId>>,
}

impl Navigation {
    #[must_use]
    pub fn selected(&self) -> Option<CourseId> {
        (self.selected)()
    }

    pub fn select(&self, course_id: CourseId) {
        let mut selected = self.selected;
        selected.set(Some(course_id));
    }

    pub fn back(&self) {
        let mut selected = self.selected;
        selected.set(None);
    }
}

pub fn use_navigation() -> Navigation {
    Navigation {
        selected: use_signal(|| None::<CourseId>),
    }
}

#[component]
pub fn App() -> Element {
    let nav = use_navigation();

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "E-Learning Platform" }

        Shell { nav }
    }
}

/// Navigation shell: the catalog, or the detail view of the selected course.
///
/// The detail view is keyed by course id, so switching courses remounts it
/// into its loading state.
#[component]
pub fn Shell(nav: Navigation) -> Element {
    rsx! {
        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                match nav.selected() {
                    Some(course_id) => rsx! {
                        CourseDetailView {
                            key: "{course_id}",
                            course_id: course_id.clone(),
                            on_back: move |()| nav.back(),
                        }
                    },
                    None => rsx! {
                        CatalogView { on_select: move |id: CourseId| nav.select(id) }
                    },
                }
            }
        }
    }
}
