use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{CourseId, ProgressId, ViewerId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("completed progress must carry a completion timestamp")]
    MissingCompletedAt,

    #[error("incomplete progress must not carry a completion timestamp")]
    UnexpectedCompletedAt,
}

//
// ─── PROGRESS RECORD ───────────────────────────────────────────────────────────
//

/// Per-(viewer, course) completion record.
///
/// `completed_at` is set exactly when `completed` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    id: ProgressId,
    viewer_id: ViewerId,
    course_id: CourseId,
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl UserProgress {
    /// Rebuilds a record read back from storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError` if `completed` and `completed_at` disagree.
    pub fn from_persisted(
        id: ProgressId,
        viewer_id: ViewerId,
        course_id: CourseId,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, ProgressError> {
        match (completed, completed_at) {
            (true, None) => Err(ProgressError::MissingCompletedAt),
            (false, Some(_)) => Err(ProgressError::UnexpectedCompletedAt),
            _ => Ok(Self {
                id,
                viewer_id,
                course_id,
                completed,
                completed_at,
            }),
        }
    }

    /// A fresh record; `at` is kept only when `completed` is true.
    #[must_use]
    pub fn new(
        id: ProgressId,
        viewer_id: ViewerId,
        course_id: CourseId,
        completed: bool,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            viewer_id,
            course_id,
            completed,
            completed_at: completed.then_some(at),
        }
    }

    /// Returns a copy with the completion flag set, stamping `at` when completing
    /// and clearing the timestamp otherwise.
    #[must_use]
    pub fn with_completion(&self, completed: bool, at: DateTime<Utc>) -> Self {
        Self {
            completed,
            completed_at: completed.then_some(at),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn id(&self) -> &ProgressId {
        &self.id
    }

    #[must_use]
    pub fn viewer_id(&self) -> &ViewerId {
        &self.viewer_id
    }

    #[must_use]
    pub fn course_id(&self) -> &CourseId {
        &self.course_id
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

//
// ─── COMPLETION STATE MACHINE ──────────────────────────────────────────────────
//

/// Completion sub-state of a loaded course, driven by the progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionState {
    /// No progress row exists yet.
    Unstarted,
    Incomplete,
    Complete,
}

impl CompletionState {
    #[must_use]
    pub fn of(progress: Option<&UserProgress>) -> Self {
        match progress {
            None => Self::Unstarted,
            Some(p) if p.is_completed() => Self::Complete,
            Some(_) => Self::Incomplete,
        }
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The transition a toggle performs from this state.
    #[must_use]
    pub fn toggle(self) -> CompletionTransition {
        match self {
            Self::Unstarted => CompletionTransition::Start,
            Self::Incomplete => CompletionTransition::Complete,
            Self::Complete => CompletionTransition::Reopen,
        }
    }
}

/// One step of the completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionTransition {
    /// Create the first row for the pair, already completed.
    Start,
    /// Mark an existing incomplete row as completed.
    Complete,
    /// Mark an existing completed row as incomplete.
    Reopen,
}

impl CompletionTransition {
    /// Completion flag the record carries after this transition.
    #[must_use]
    pub fn target_completed(self) -> bool {
        !matches!(self, Self::Reopen)
    }

    #[must_use]
    pub fn target_state(self) -> CompletionState {
        if self.target_completed() {
            CompletionState::Complete
        } else {
            CompletionState::Incomplete
        }
    }
}
