use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use catalog_core::model::{CourseId, UserProgress, ViewerId};
use catalog_core::time::fixed_now;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use services::{CatalogService, Clock, CourseDetailService};
use storage::repository::Storage;

use crate::app::{Navigation, Shell, use_navigation};
use crate::context::{UiApp, build_app_context};
use crate::views::{
    CatalogView, CourseDetailPanel, ToggleState, build_toggle_action, use_toggle_state,
};

#[derive(Clone)]
struct TestApp {
    viewer_id: ViewerId,
    catalog: Arc<CatalogService>,
    course_detail: Arc<CourseDetailService>,
}

impl UiApp for TestApp {
    fn viewer_id(&self) -> ViewerId {
        self.viewer_id.clone()
    }

    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn course_detail(&self) -> Arc<CourseDetailService> {
        Arc::clone(&self.course_detail)
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Catalog,
    Detail(CourseId),
    Shell,
}

#[derive(Clone, Default)]
struct HarnessHandles {
    navigation: Rc<RefCell<Option<Navigation>>>,
    toggle: Rc<RefCell<Option<(ToggleState, Callback<Option<UserProgress>>)>>>,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    handles: HarnessHandles,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewHarnessRoot(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    let handles = props.handles.clone();
    match props.view {
        ViewKind::Catalog => rsx! { CatalogView { on_select: |_: CourseId| {} } },
        ViewKind::Detail(course_id) => rsx! { DetailHarness { course_id, handles } },
        ViewKind::Shell => rsx! { ShellHarness { handles } },
    }
}

#[derive(Props, Clone)]
struct DetailHarnessProps {
    course_id: CourseId,
    handles: HarnessHandles,
}

impl PartialEq for DetailHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn DetailHarness(props: DetailHarnessProps) -> Element {
    let toggle = use_toggle_state();
    let on_toggle = build_toggle_action(toggle, props.course_id.clone());
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.toggle.borrow_mut() = Some((toggle, on_toggle));
    }
    rsx! {
        CourseDetailPanel {
            course_id: props.course_id.clone(),
            toggle,
            on_toggle,
            on_back: |()| {},
        }
    }
}

#[derive(Props, Clone)]
struct ShellHarnessProps {
    handles: HarnessHandles,
}

impl PartialEq for ShellHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ShellHarness(props: ShellHarnessProps) -> Element {
    let nav = use_navigation();
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.navigation.borrow_mut() = Some(nav);
    }
    rsx! { Shell { nav } }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    handles: HarnessHandles,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let spawned tasks and pending resources finish.
    pub async fn pump(&mut self) {
        for _ in 0..3 {
            self.drive_async().await;
        }
    }

    /// Rebuild, then let pending resources settle.
    pub async fn settle(&mut self) {
        self.rebuild();
        self.pump().await;
    }

    /// Runs `f` with the dom's runtime current, as event handlers do.
    pub fn in_runtime<O>(&self, f: impl FnOnce() -> O) -> O {
        self.dom.in_runtime(f)
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }

    pub fn navigation(&self) -> Navigation {
        self.handles
            .navigation
            .borrow()
            .clone()
            .expect("navigation registered")
    }

    pub fn toggle(&self) -> (ToggleState, Callback<Option<UserProgress>>) {
        self.handles
            .toggle
            .borrow()
            .clone()
            .expect("toggle registered")
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, storage: &Storage) -> ViewHarness {
    let clock = Clock::fixed(fixed_now());
    let app = Arc::new(TestApp {
        viewer_id: ViewerId::new("viewer-1").expect("viewer id"),
        catalog: Arc::new(CatalogService::new(Arc::clone(&storage.courses))),
        course_detail: Arc::new(CourseDetailService::new(
            clock,
            Arc::clone(&storage.courses),
            Arc::clone(&storage.lessons),
            Arc::clone(&storage.progress),
        )),
    });

    let handles = HarnessHandles::default();
    let dom = VirtualDom::new_with_props(
        ViewHarnessRoot,
        ViewHarnessProps {
            app,
            view,
            handles: handles.clone(),
        },
    );
    ViewHarness { dom, handles }
}
