use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    Lab, LabSearch, LabWithMembers, LabWithProfessor, LabWithResearchers, NewLab, Subscription,
    User, UserWithLabs,
};
use crate::types::{LabId, UserId};

/// Errors raised by data-access providers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl RepositoryError {
    pub fn user_not_found(id: UserId) -> Self {
        RepositoryError::NotFound { entity: "user", id }
    }

    pub fn lab_not_found(id: LabId) -> Self {
        RepositoryError::NotFound { entity: "lab", id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// User lookups owned by the identity subsystem
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `NotFound` when the user does not exist.
    async fn find_by_id(&self, id: UserId) -> RepositoryResult<User>;

    async fn save(&self, user: &User) -> RepositoryResult<()>;

    /// The user plus every lab associated with it, ordered by lab id.
    async fn find_by_id_with_labs(&self, id: UserId) -> RepositoryResult<UserWithLabs>;
}

#[async_trait]
pub trait LabRepository: Send + Sync {
    async fn find_by_search_option(&self, search: &LabSearch) -> RepositoryResult<Vec<Lab>>;

    /// Persist a new lab and return it with its assigned id.
    async fn insert(&self, lab: NewLab) -> RepositoryResult<Lab>;

    /// Persist changes to an existing lab.
    async fn save(&self, lab: &Lab) -> RepositoryResult<()>;

    async fn find_by_id(&self, id: LabId) -> RepositoryResult<Lab>;

    async fn find_by_id_with_researchers(&self, id: LabId) -> RepositoryResult<LabWithResearchers>;

    async fn find_by_id_with_researchers_and_professor(
        &self,
        id: LabId,
    ) -> RepositoryResult<LabWithMembers>;

    async fn find_by_id_with_professor(&self, id: LabId) -> RepositoryResult<LabWithProfessor>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Absence is `Ok(None)`, never an error.
    async fn find_by_user_id_and_lab_id(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> RepositoryResult<Option<Subscription>>;
}
