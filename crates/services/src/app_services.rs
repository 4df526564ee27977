use std::sync::Arc;

use catalog_core::model::ViewerId;
use storage::local::LocalStore;
use storage::repository::Storage;
use storage::rest::RestConfig;

use crate::catalog_service::CatalogService;
use crate::course_detail_service::CourseDetailService;
use crate::error::AppServicesError;
use crate::identity_service::IdentityService;
use crate::Clock;

/// Assembles app-facing services and resolves the viewer identity once.
#[derive(Clone)]
pub struct AppServices {
    viewer_id: ViewerId,
    catalog: Arc<CatalogService>,
    course_detail: Arc<CourseDetailService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or identity setup fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        local: Arc<dyn LocalStore>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, local)
    }

    /// Build services backed by the hosted REST data store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the client cannot be configured or identity setup fails.
    pub fn new_rest(
        config: &RestConfig,
        clock: Clock,
        local: Arc<dyn LocalStore>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::rest(config)?;
        Self::from_storage(storage, clock, local)
    }

    /// Build services over an already constructed `Storage`.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Identity` if the viewer id cannot be loaded or saved.
    pub fn from_storage(
        storage: Storage,
        clock: Clock,
        local: Arc<dyn LocalStore>,
    ) -> Result<Self, AppServicesError> {
        let viewer_id = IdentityService::new(local).get_or_create_viewer_id()?;

        let catalog = Arc::new(CatalogService::new(Arc::clone(&storage.courses)));
        let course_detail = Arc::new(CourseDetailService::new(
            clock,
            Arc::clone(&storage.courses),
            Arc::clone(&storage.lessons),
            Arc::clone(&storage.progress),
        ));

        Ok(Self {
            viewer_id,
            catalog,
            course_detail,
        })
    }

    #[must_use]
    pub fn viewer_id(&self) -> &ViewerId {
        &self.viewer_id
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
