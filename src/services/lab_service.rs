use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, warn};

use crate::config::{config, ServiceConfig};
use crate::database::memory::MemoryStore;
use crate::database::models::{LabFields, LabSearch, NewLab, UpdateLab, User, UserWithLabs};
use crate::database::repository::{LabRepository, SubscriptionRepository, UserRepository};
use crate::error::{LabError, LabResult};
use crate::services::views::{Ack, LabDetail, LabSummary};
use crate::types::{LabId, UserId};

/// Authorization and assembly rules for lab operations.
///
/// Every operation takes an already-authenticated caller id. The service
/// holds no mutable state; clones share the same providers.
#[derive(Clone)]
pub struct LabService {
    users: Arc<dyn UserRepository>,
    labs: Arc<dyn LabRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    config: ServiceConfig,
}

impl LabService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        labs: Arc<dyn LabRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            users,
            labs,
            subscriptions,
            config: config().service.clone(),
        }
    }

    /// Use one in-memory store for all three providers
    pub fn from_store(store: Arc<MemoryStore>) -> Self {
        Self::new(store.clone(), store.clone(), store)
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// List labs matching `search`, each paired with its professor.
    pub async fn list_labs(&self, search: LabSearch) -> LabResult<Vec<LabSummary>> {
        let search = search.capped(self.config.max_list_limit);
        let labs = self.labs.find_by_search_option(&search).await?;
        debug!(count = labs.len(), "labs matched search");

        self.fan_out(labs, |lab| async move {
            let professor = self.users.find_by_id(lab.professor_id).await?;
            Ok::<_, LabError>(LabSummary::new(&lab, &professor))
        })
        .await
    }

    /// Create a lab owned by the caller. Professors only.
    pub async fn create_lab(&self, fields: LabFields, caller_id: UserId) -> LabResult<Ack> {
        let user = self.users.find_by_id(caller_id).await?;
        if !user.is_professor() {
            warn!(caller_id, "non-professor attempted to create a lab");
            return Err(LabError::unauthorized("only professors can create a lab"));
        }

        let lab = self.labs.insert(NewLab::new(fields, caller_id)).await?;
        info!(lab_id = lab.id, professor_id = caller_id, "lab created");
        Ok(Ack::ok())
    }

    /// Overwrite a lab's name, category and introduction. Owner only.
    pub async fn update_lab(&self, update: UpdateLab, caller_id: UserId) -> LabResult<Ack> {
        let _caller = self.users.find_by_id(caller_id).await?;

        let mut existing = match self.labs.find_by_id_with_researchers(update.id).await {
            Ok(found) => found.lab,
            Err(err) if err.is_not_found() => return Err(LabError::not_found("lab does not exist")),
            Err(err) => return Err(err.into()),
        };

        if existing.professor_id != caller_id {
            warn!(caller_id, lab_id = existing.id, "non-owner attempted to update a lab");
            return Err(LabError::unauthorized("only the owning professor can update a lab"));
        }

        existing.apply(update.fields);
        self.labs.save(&existing).await?;
        info!(lab_id = existing.id, caller_id, "lab updated");
        Ok(Ack::ok())
    }

    /// Lab detail with non-professor researchers and the caller's
    /// subscription flag.
    pub async fn get_lab_detail(&self, lab_id: LabId, caller_id: UserId) -> LabResult<LabDetail> {
        let found = self.labs.find_by_id_with_researchers_and_professor(lab_id).await?;
        let is_subscribed = self
            .subscriptions
            .find_by_user_id_and_lab_id(caller_id, lab_id)
            .await?
            .is_some();

        let members: Vec<User> = self
            .fan_out(found.researcher_ids, |id| async move {
                Ok::<_, LabError>(self.users.find_by_id(id).await?)
            })
            .await?;
        let researchers: Vec<User> = members.into_iter().filter(|u| !u.is_professor()).collect();

        debug!(lab_id, caller_id, researchers = researchers.len(), is_subscribed, "lab detail assembled");
        Ok(LabDetail::new(&found.lab, &found.professor, &researchers, is_subscribed))
    }

    /// Make the caller a member of `lab_id`, replacing any previous lab.
    pub async fn join_lab(&self, lab_id: LabId, caller_id: UserId) -> LabResult<Ack> {
        match self.labs.find_by_id(lab_id).await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => return Err(LabError::not_found("no matching lab")),
            Err(err) => return Err(err.into()),
        }

        let mut researcher = self.users.find_by_id(caller_id).await?;
        let previous = researcher.lab_id.replace(lab_id);
        self.users.save(&researcher).await?;
        info!(lab_id, caller_id, ?previous, "user joined lab");
        Ok(Ack::ok())
    }

    /// Labs associated with the caller, each paired with its professor.
    pub async fn get_my_lab(&self, caller_id: UserId) -> LabResult<Vec<LabSummary>> {
        let UserWithLabs { labs, .. } = self.users.find_by_id_with_labs(caller_id).await?;

        self.fan_out(labs, |lab| async move {
            let found = self.labs.find_by_id_with_professor(lab.id).await?;
            Ok::<_, LabError>(LabSummary::new(&lab, &found.professor))
        })
        .await
    }

    /// Run `lookup` over `items` with bounded concurrency.
    /// Output order matches input order; the first error aborts the rest.
    async fn fan_out<T, R, F, Fut>(&self, items: Vec<T>, lookup: F) -> LabResult<Vec<R>>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = LabResult<R>>,
    {
        stream::iter(items)
            .map(lookup)
            .buffered(self.config.lookup_concurrency.max(1))
            .try_collect()
            .await
    }
}
