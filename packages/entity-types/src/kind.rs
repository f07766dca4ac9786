//! The `(Major, Minor)` kind classification tuple.

use serde::{Deserialize, Serialize};

use crate::error::EntityError;

/// An entity's classification tuple. Immutable after creation (Invariant 1).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Kind {
    pub major: String,
    pub minor: String,
}

impl Kind {
    pub fn new(major: impl Into<String>, minor: impl Into<String>) -> Self {
        Self {
            major: major.into(),
            minor: minor.into(),
        }
    }

    pub fn validate_major(&self) -> Result<(), EntityError> {
        if self.major.is_empty() {
            return Err(EntityError::invalid("Kind.Major", "must not be empty"));
        }
        Ok(())
    }
}
