use serde::{Deserialize, Serialize};

use crate::database::models::lab::Lab;
use crate::types::{LabId, Role, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// Current lab membership. Overwritten on join.
    #[serde(default)]
    pub lab_id: Option<LabId>,
}

impl User {
    pub fn is_professor(&self) -> bool {
        self.role.is_professor()
    }
}

/// A user together with the labs it is associated with.
#[derive(Debug, Clone)]
pub struct UserWithLabs {
    pub user: User,
    pub labs: Vec<Lab>,
}
