use std::sync::Arc;

use async_trait::async_trait;

use crate::config::ServiceConfig;
use crate::database::memory::MemoryStore;
use crate::database::models::{Lab, User, UserWithLabs};
use crate::database::repository::{
    LabRepository, RepositoryError, RepositoryResult, UserRepository,
};
use crate::services::LabService;
use crate::types::{LabId, Role, UserId};

/// Seeded store plus a service wired to it
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub service: LabService,
}

impl TestContext {
    /// Users: 1 professor (member of 10), 2 student, 3 professor,
    /// 5 student (member of 10), 9 student.
    /// Labs: 10 "Vision Lab" owned by 1, 11 "Systems Lab" owned by 3.
    pub async fn scenario() -> Self {
        let store = Arc::new(MemoryStore::new());

        for (id, role, lab_id) in [
            (1, Role::Professor, Some(10)),
            (2, Role::Student, None),
            (3, Role::Professor, None),
            (5, Role::Student, Some(10)),
            (9, Role::Student, None),
        ] {
            store.insert_user(user(id, role, lab_id)).await.unwrap();
        }
        store.insert_lab(lab(10, "Vision Lab", 1)).await.unwrap();
        store.insert_lab(lab(11, "Systems Lab", 3)).await.unwrap();

        let service = LabService::from_store(store.clone()).with_config(ServiceConfig::default());
        Self { store, service }
    }

    pub async fn lab(&self, id: LabId) -> Lab {
        LabRepository::find_by_id(self.store.as_ref(), id).await.unwrap()
    }

    pub async fn user(&self, id: UserId) -> User {
        UserRepository::find_by_id(self.store.as_ref(), id).await.unwrap()
    }

    pub async fn lab_named(&self, name: &str) -> Option<Lab> {
        self.store.labs().await.into_iter().find(|lab| lab.name == name)
    }
}

pub fn user(id: UserId, role: Role, lab_id: Option<LabId>) -> User {
    User {
        id,
        name: format!("user-{}", id),
        email: format!("user{}@example.edu", id),
        role,
        lab_id,
    }
}

pub fn lab(id: LabId, name: &str, professor_id: UserId) -> Lab {
    Lab {
        id,
        name: name.to_string(),
        category: "ai".to_string(),
        introduction: "intro".to_string(),
        professor_id,
    }
}

/// User provider whose backend is always down
pub struct FlakyUsers;

#[async_trait]
impl UserRepository for FlakyUsers {
    async fn find_by_id(&self, _id: UserId) -> RepositoryResult<User> {
        Err(RepositoryError::Unavailable("user backend timed out".to_string()))
    }

    async fn save(&self, _user: &User) -> RepositoryResult<()> {
        Err(RepositoryError::Unavailable("user backend timed out".to_string()))
    }

    async fn find_by_id_with_labs(&self, _id: UserId) -> RepositoryResult<UserWithLabs> {
        Err(RepositoryError::Unavailable("user backend timed out".to_string()))
    }
}
