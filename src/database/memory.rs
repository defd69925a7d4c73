use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::models::{
    Lab, LabSearch, LabWithMembers, LabWithProfessor, LabWithResearchers, NewLab, Subscription,
    User, UserWithLabs,
};
use crate::database::repository::{
    LabRepository, RepositoryError, RepositoryResult, SubscriptionRepository, UserRepository,
};
use crate::types::{LabId, UserId};

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    labs: BTreeMap<LabId, Lab>,
    subscriptions: BTreeSet<Subscription>,
}

impl State {
    fn user(&self, id: UserId) -> RepositoryResult<&User> {
        self.users.get(&id).ok_or_else(|| RepositoryError::user_not_found(id))
    }

    fn lab(&self, id: LabId) -> RepositoryResult<&Lab> {
        self.labs.get(&id).ok_or_else(|| RepositoryError::lab_not_found(id))
    }

    fn researcher_ids(&self, lab_id: LabId) -> Vec<UserId> {
        self.users
            .values()
            .filter(|user| user.lab_id == Some(lab_id))
            .map(|user| user.id)
            .collect()
    }

    fn next_lab_id(&self) -> RepositoryResult<LabId> {
        match self.labs.keys().next_back() {
            None => Ok(1),
            Some(last) => last
                .checked_add(1)
                .ok_or_else(|| RepositoryError::Conflict("lab id space exhausted".to_string())),
        }
    }
}

/// In-process store implementing every provider trait.
///
/// Share it behind an `Arc` and hand clones to the service as each of the
/// three repositories. All maps sit behind one lock so multi-entity reads
/// see a consistent view.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user. Fails on a duplicate id.
    pub async fn insert_user(&self, user: User) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(RepositoryError::Conflict(format!("user {} already exists", user.id)));
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    /// Seed a lab with a fixed id. Fails on a duplicate id.
    pub async fn insert_lab(&self, lab: Lab) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        if state.labs.contains_key(&lab.id) {
            return Err(RepositoryError::Conflict(format!("lab {} already exists", lab.id)));
        }
        state.labs.insert(lab.id, lab);
        Ok(())
    }

    /// Record that `user_id` follows `lab_id`. Idempotent.
    pub async fn subscribe(&self, user_id: UserId, lab_id: LabId) {
        let mut state = self.state.write().await;
        state.subscriptions.insert(Subscription { user_id, lab_id });
    }

    pub async fn users(&self) -> Vec<User> {
        self.state.read().await.users.values().cloned().collect()
    }

    pub async fn labs(&self) -> Vec<Lab> {
        self.state.read().await.labs.values().cloned().collect()
    }

    pub async fn subscriptions(&self) -> Vec<Subscription> {
        self.state.read().await.subscriptions.iter().copied().collect()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepositoryResult<User> {
        self.state.read().await.user(id).cloned()
    }

    async fn save(&self, user: &User) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        state.users.insert(user.id, user.clone());
        debug!(user_id = user.id, "saved user");
        Ok(())
    }

    async fn find_by_id_with_labs(&self, id: UserId) -> RepositoryResult<UserWithLabs> {
        let state = self.state.read().await;
        let user = state.user(id)?.clone();
        let labs = state
            .labs
            .values()
            .filter(|lab| user.lab_id == Some(lab.id) || lab.professor_id == user.id)
            .cloned()
            .collect();
        Ok(UserWithLabs { user, labs })
    }
}

#[async_trait]
impl LabRepository for MemoryStore {
    async fn find_by_search_option(&self, search: &LabSearch) -> RepositoryResult<Vec<Lab>> {
        let state = self.state.read().await;
        let matching = state
            .labs
            .values()
            .filter(|lab| search.matches(lab))
            .skip(search.offset.unwrap_or(0));
        let labs = match search.limit {
            Some(limit) => matching.take(limit).cloned().collect(),
            None => matching.cloned().collect(),
        };
        Ok(labs)
    }

    async fn insert(&self, lab: NewLab) -> RepositoryResult<Lab> {
        let mut state = self.state.write().await;
        let id = state.next_lab_id()?;
        let lab = lab.into_lab(id);
        state.labs.insert(lab.id, lab.clone());
        debug!(lab_id = lab.id, professor_id = lab.professor_id, "inserted lab");
        Ok(lab)
    }

    async fn save(&self, lab: &Lab) -> RepositoryResult<()> {
        let mut state = self.state.write().await;
        match state.labs.get_mut(&lab.id) {
            Some(existing) => {
                *existing = lab.clone();
                debug!(lab_id = lab.id, "saved lab");
                Ok(())
            }
            None => Err(RepositoryError::lab_not_found(lab.id)),
        }
    }

    async fn find_by_id(&self, id: LabId) -> RepositoryResult<Lab> {
        self.state.read().await.lab(id).cloned()
    }

    async fn find_by_id_with_researchers(&self, id: LabId) -> RepositoryResult<LabWithResearchers> {
        let state = self.state.read().await;
        let lab = state.lab(id)?.clone();
        Ok(LabWithResearchers {
            researcher_ids: state.researcher_ids(id),
            lab,
        })
    }

    async fn find_by_id_with_researchers_and_professor(
        &self,
        id: LabId,
    ) -> RepositoryResult<LabWithMembers> {
        let state = self.state.read().await;
        let lab = state.lab(id)?.clone();
        let professor = state.user(lab.professor_id)?.clone();
        Ok(LabWithMembers {
            researcher_ids: state.researcher_ids(id),
            lab,
            professor,
        })
    }

    async fn find_by_id_with_professor(&self, id: LabId) -> RepositoryResult<LabWithProfessor> {
        let state = self.state.read().await;
        let lab = state.lab(id)?.clone();
        let professor = state.user(lab.professor_id)?.clone();
        Ok(LabWithProfessor { lab, professor })
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn find_by_user_id_and_lab_id(
        &self,
        user_id: UserId,
        lab_id: LabId,
    ) -> RepositoryResult<Option<Subscription>> {
        let key = Subscription { user_id, lab_id };
        Ok(self.state.read().await.subscriptions.get(&key).copied())
    }
}
