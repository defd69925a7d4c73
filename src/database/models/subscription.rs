use serde::{Deserialize, Serialize};

use crate::types::{LabId, UserId};

/// A user following a lab. Existence is the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: UserId,
    pub lab_id: LabId,
}
