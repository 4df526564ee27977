#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog_service;
pub mod course_detail_service;
pub mod error;
pub mod identity_service;

pub use catalog_core::Clock;

pub use app_services::AppServices;
pub use catalog_service::CatalogService;
pub use course_detail_service::{CourseDetail, CourseDetailService};
pub use error::{AppServicesError, CatalogError, CourseDetailError, IdentityError};
pub use identity_service::{IdentityService, VIEWER_ID_KEY};
