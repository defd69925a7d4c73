/// Shared types used across the codebase

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type LabId = i64;

/// Role carried by every user record.
/// Professors may create and own labs; everyone else is a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Professor,
    #[default]
    Student,
}

impl Role {
    pub fn is_professor(&self) -> bool {
        matches!(self, Role::Professor)
    }
}
