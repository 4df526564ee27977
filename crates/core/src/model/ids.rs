use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Error type for parsing an ID from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

// Identifiers are assigned by the external store and stay opaque here. The
// value is kept byte for byte so it can be used to query the store again.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new `", stringify!($name), "`.")]
            ///
            /// # Errors
            ///
            /// Returns `ParseIdError` if the value is blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ParseIdError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ParseIdError {
                        kind: stringify!($name),
                    });
                }
                Ok(Self(id))
            }

            /// Wraps an identifier read back from the store without validating it.
            #[must_use]
            pub fn from_persisted(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a Course
    CourseId
);

string_id!(
    /// Unique identifier for a Lesson
    LessonId
);

string_id!(
    /// Unique identifier for a `UserProgress` row
    ProgressId
);

string_id!(
    /// Locally generated identifier standing in for a user account.
    ///
    /// Scopes every `UserProgress` row; never rotated.
    ViewerId
);

impl ViewerId {
    /// Generates a fresh random viewer identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl ProgressId {
    /// Generates a fresh random row identifier for stores that do not assign one.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
