use std::sync::Arc;

use catalog_core::model::Course;
use storage::repository::CourseRepository;
use tracing::debug;

use crate::error::CatalogError;

/// Read side of the course catalog.
#[derive(Clone)]
pub struct CatalogService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Every course, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Storage` if the repository read fails.
    pub async fn load_courses(&self) -> Result<Vec<Course>, CatalogError> {
        let courses = self.courses.list_courses().await?;
        debug!(count = courses.len(), "loaded course catalog");
        Ok(courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::model::CourseId;
    use catalog_core::time::fixed_now;
    use chrono::Duration;
    use storage::repository::{InMemoryRepository, StorageError};

    #[tokio::test]
    async fn returns_courses_in_creation_order() {
        let repo = InMemoryRepository::new();
        for (id, minutes) in [("b", 5), ("a", 0), ("c", 9)] {
            let course = Course::new(
                CourseId::new(id).unwrap(),
                id,
                "",
                "",
                "Beginner",
                "",
                fixed_now() + Duration::minutes(minutes),
            )
            .unwrap();
            repo.upsert_course(&course).await.unwrap();
        }

        let service = CatalogService::new(Arc::new(repo));
        let ids: Vec<_> = service
            .load_courses()
            .await
            .unwrap()
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    struct Offline;

    #[async_trait::async_trait]
    impl CourseRepository for Offline {
        async fn list_courses(&self) -> Result<Vec<Course>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn get_course(&self, _id: &CourseId) -> Result<Option<Course>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn upsert_course(&self, _course: &Course) -> Result<(), StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn read_failure_is_returned() {
        let service = CatalogService::new(Arc::new(Offline));
        let err = service.load_courses().await.unwrap_err();
        assert!(matches!(err, CatalogError::Storage(StorageError::Connection(_))));
    }
}
