//! Shared error types for the services crate.

use thiserror::Error;

use storage::local::LocalStoreError;
use storage::repository::StorageError;
use storage::rest::RestInitError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `CatalogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `CourseDetailService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseDetailError {
    #[error("failed to load course: {0}")]
    Course(#[source] StorageError),
    #[error("failed to load lessons: {0}")]
    Lessons(#[source] StorageError),
    #[error("failed to save completion: {0}")]
    Completion(#[source] StorageError),
}

/// Errors emitted by `IdentityService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IdentityError {
    #[error(transparent)]
    Store(#[from] LocalStoreError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Rest(#[from] RestInitError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
}
