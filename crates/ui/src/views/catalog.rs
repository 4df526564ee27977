use catalog_core::model::CourseId;
use dioxus::prelude::*;
use tracing::error;

use crate::context::AppContext;
use crate::views::{ViewState, view_state_from_resource};
use crate::vm::{CourseCardVm, map_course_cards};

/// Grid of every course. Clicking a card reports its id through `on_select`.
#[component]
pub fn CatalogView(on_select: EventHandler<CourseId>) -> Element {
    let ctx = use_context::<AppContext>();
    let catalog = ctx.catalog();

    let resource = use_resource(move || {
        let catalog = catalog.clone();
        async move {
            match catalog.load_courses().await {
                Ok(courses) => map_course_cards(&courses),
                Err(err) => {
                    error!(error = %err, "failed to load courses");
                    Vec::new()
                }
            }
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page catalog",
            header { class: "catalog-header",
                h1 { "E-Learning Platform" }
                p { "Discover courses designed to help you grow your skills and advance your career" }
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Loading courses..." }
                },
                ViewState::Ready(cards) => rsx! {
                    if cards.is_empty() {
                        p { class: "empty", "No courses available yet" }
                    } else {
                        div { class: "course-grid",
                            for card in cards {
                                CourseCard { key: "{card.id}", card: card.clone(), on_select }
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn CourseCard(card: CourseCardVm, on_select: EventHandler<CourseId>) -> Element {
    let id = card.id.clone();
    rsx! {
        article {
            class: "course-card",
            onclick: move |_| on_select.call(id.clone()),
            img { src: "{card.image_url}", alt: "{card.title}" }
            div { class: "body",
                span { class: card.tone.badge_class(), "{card.level}" }
                h3 { "{card.title}" }
                p { class: "description", "{card.description}" }
                div { class: "meta",
                    span { class: "duration", "{card.duration}" }
                    span { class: "level", "{card.level}" }
                }
                button { class: "cta", "View Course" }
            }
        }
    }
}
