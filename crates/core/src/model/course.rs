use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::CourseId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Difficulty classification derived from a course's free-form level label.
///
/// The label set is open: anything not recognised falls into `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelKind {
    Beginner,
    Intermediate,
    Advanced,
    Other,
}

impl LevelKind {
    /// Classifies a level label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn classify(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Other,
        }
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A top-level catalog item. Read-only from the browser's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    image_url: String,
    level: String,
    duration: String,
    created_at: DateTime<Utc>,
}

impl Course {
    /// Creates a course.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is blank.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        image_url: impl Into<String>,
        level: impl Into<String>,
        duration: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        let title = title.into().trim().to_owned();
        if title.is_empty() {
            return Err(CourseError::EmptyTitle);
        }

        Ok(Self {
            id,
            title,
            description: description.into(),
            image_url: image_url.into(),
            level: level.into(),
            duration: duration.into(),
            created_at,
        })
    }

    /// Rebuilds a course from a stored row. Values are taken as stored; the
    /// title is not required to be non-blank.
    #[must_use]
    pub fn from_persisted(
        id: CourseId,
        title: String,
        description: String,
        image_url: String,
        level: String,
        duration: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            image_url,
            level,
            duration,
            created_at,
        }
    }

    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// The level label exactly as stored.
    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    #[must_use]
    pub fn level_kind(&self) -> LevelKind {
        LevelKind::classify(&self.level)
    }

    /// Human-readable duration, e.g. "6 weeks".
    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
