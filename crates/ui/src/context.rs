use std::sync::Arc;

use catalog_core::model::ViewerId;
use services::{CatalogService, CourseDetailService};

/// What the views need from the composition root.
pub trait UiApp: Send + Sync {
    fn viewer_id(&self) -> ViewerId;

    fn catalog(&self) -> Arc<CatalogService>;
    fn course_detail(&self) -> Arc<CourseDetailService>;
}

#[derive(Clone)]
pub struct AppContext {
    viewer_id: ViewerId,
    catalog: Arc<CatalogService>,
    course_detail: Arc<CourseDetailService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            viewer_id: app.viewer_id(),
            catalog: app.catalog(),
            course_detail: app.course_detail(),
        }
    }

    /// Resolved once at startup; every progress read and write is scoped by it.
    #[must_use]
    pub fn viewer_id(&self) -> ViewerId {
        self.viewer_id.clone()
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn course_detail(&self) -> Arc<CourseDetailService> {
        Arc::clone(&self.course_detail)
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
