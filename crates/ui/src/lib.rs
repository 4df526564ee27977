pub mod app;
pub mod context;
pub mod vm;
pub mod views;

pub use app::{App, Navigation, Shell, use_navigation};
pub use context::{AppContext, UiApp, build_app_context};
