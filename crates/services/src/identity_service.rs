use std::sync::Arc;

use catalog_core::model::ViewerId;
use storage::local::LocalStore;
use tracing::{debug, warn};

use crate::error::IdentityError;

/// Local store key holding the generated viewer identity.
pub const VIEWER_ID_KEY: &str = "user_id";

/// Loads or creates the per-device viewer identity.
#[derive(Clone)]
pub struct IdentityService {
    store: Arc<dyn LocalStore>,
}

impl IdentityService {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Return the stored viewer id, generating and persisting one if absent.
    ///
    /// A blank stored value is treated as absent and replaced.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::Store` if the local store cannot be read or written.
    pub fn get_or_create_viewer_id(&self) -> Result<ViewerId, IdentityError> {
        if let Some(raw) = self.store.get(VIEWER_ID_KEY)? {
            match ViewerId::new(raw) {
                Ok(id) => return Ok(id),
                Err(err) => warn!(error = %err, "discarding unusable stored viewer id"),
            }
        }

        let id = ViewerId::generate();
        self.store.set(VIEWER_ID_KEY, id.as_str())?;
        debug!(viewer_id = %id, "created viewer identity");
        Ok(id)
    }
}
