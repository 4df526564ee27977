mod catalog;
mod course_detail;
mod state;

pub use catalog::CatalogView;
pub use course_detail::{
    CourseDetailPanel, CourseDetailView, ToggleState, build_toggle_action, use_toggle_state,
};
pub use state::{ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
