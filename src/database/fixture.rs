use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

use crate::database::memory::MemoryStore;
use crate::database::models::{Lab, Subscription, User};
use crate::database::repository::RepositoryError;
use crate::types::Role;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to access fixture file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON fixture: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid YAML fixture: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Inconsistent fixture: {0}")]
    Invalid(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Snapshot of users, labs and subscriptions stored as JSON or YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub labs: Vec<Lab>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

enum Format {
    Json,
    Yaml,
}

impl Format {
    fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Format::Yaml,
            _ => Format::Json,
        }
    }
}

impl Fixture {
    pub fn read(path: &Path) -> Result<Self, FixtureError> {
        let raw = fs::read_to_string(path)?;
        let fixture: Fixture = match Format::for_path(path) {
            Format::Json => serde_json::from_str(&raw)?,
            Format::Yaml => serde_yaml::from_str(&raw)?,
        };
        fixture.validate()?;
        Ok(fixture)
    }

    pub fn write(&self, path: &Path) -> Result<(), FixtureError> {
        let raw = match Format::for_path(path) {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Yaml => serde_yaml::to_string(self)?,
        };
        let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        // Stage next to the target, then rename over it
        let mut staged = NamedTempFile::new_in(parent)?;
        staged.write_all(raw.as_bytes())?;
        staged.flush()?;
        staged.persist(path).map_err(|e| e.error)?;
        info!("Wrote fixture {}", path.display());
        Ok(())
    }

    /// Check references between users, labs and subscriptions.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let users: BTreeMap<_, _> = self.users.iter().map(|u| (u.id, u)).collect();
        let labs: BTreeSet<_> = self.labs.iter().map(|l| l.id).collect();

        for lab in &self.labs {
            match users.get(&lab.professor_id) {
                Some(owner) if owner.is_professor() => {}
                Some(_) => {
                    return Err(FixtureError::Invalid(format!(
                        "lab {} is owned by user {} who is not a professor",
                        lab.id, lab.professor_id
                    )))
                }
                None => {
                    return Err(FixtureError::Invalid(format!(
                        "lab {} references missing professor {}",
                        lab.id, lab.professor_id
                    )))
                }
            }
        }

        for user in &self.users {
            if let Some(lab_id) = user.lab_id {
                if !labs.contains(&lab_id) {
                    return Err(FixtureError::Invalid(format!(
                        "user {} is a member of missing lab {}",
                        user.id, lab_id
                    )));
                }
            }
        }

        for sub in &self.subscriptions {
            if !users.contains_key(&sub.user_id) || !labs.contains(&sub.lab_id) {
                return Err(FixtureError::Invalid(format!(
                    "subscription ({}, {}) references a missing user or lab",
                    sub.user_id, sub.lab_id
                )));
            }
        }

        Ok(())
    }

    /// Build a store holding everything in this fixture.
    pub async fn into_store(self) -> Result<MemoryStore, FixtureError> {
        self.validate()?;
        let store = MemoryStore::new();
        for user in self.users {
            store.insert_user(user).await?;
        }
        for lab in self.labs {
            store.insert_lab(lab).await?;
        }
        for sub in self.subscriptions {
            store.subscribe(sub.user_id, sub.lab_id).await;
        }
        Ok(store)
    }

    pub async fn snapshot(store: &MemoryStore) -> Self {
        Self {
            users: store.users().await,
            labs: store.labs().await,
            subscriptions: store.subscriptions().await,
        }
    }

    /// Small starter data set used by `labctl fixture init`.
    pub fn sample() -> Self {
        let user = |id, name: &str, role, lab_id| User {
            id,
            name: name.to_string(),
            email: format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
            role,
            lab_id,
        };

        Self {
            users: vec![
                user(1, "Ada Kim", Role::Professor, Some(10)),
                user(2, "Ben Park", Role::Professor, None),
                user(5, "Chris Lee", Role::Student, Some(10)),
                user(9, "Dana Cho", Role::Student, None),
            ],
            labs: vec![Lab {
                id: 10,
                name: "AI Lab".to_string(),
                category: "artificial-intelligence".to_string(),
                introduction: "Machine learning for social good".to_string(),
                professor_id: 1,
            }],
            subscriptions: vec![Subscription { user_id: 9, lab_id: 10 }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repository::LabRepository;

    #[test]
    fn sample_is_consistent() {
        assert!(Fixture::sample().validate().is_ok());
    }

    #[test]
    fn rejects_student_owned_lab() {
        let mut fixture = Fixture::sample();
        fixture.labs[0].professor_id = 5;
        let err = fixture.validate().unwrap_err();
        assert!(err.to_string().contains("not a professor"));
    }

    #[test]
    fn rejects_dangling_membership() {
        let mut fixture = Fixture::sample();
        fixture.users[3].lab_id = Some(404);
        assert!(matches!(fixture.validate(), Err(FixtureError::Invalid(_))));
    }

    #[test]
    fn yaml_extension_selects_yaml() {
        assert!(matches!(Format::for_path(Path::new("labs.yaml")), Format::Yaml));
        assert!(matches!(Format::for_path(Path::new("labs.yml")), Format::Yaml));
        assert!(matches!(Format::for_path(Path::new("labs.json")), Format::Json));
        assert!(matches!(Format::for_path(Path::new("labs")), Format::Json));
    }

    #[test]
    fn write_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labs.json");
        fs::write(&path, "stale").unwrap();

        let mut fixture = Fixture::sample();
        fixture.labs[0].name = "Rewritten".to_string();
        fixture.write(&path).unwrap();

        assert_eq!(Fixture::read(&path).unwrap(), fixture);
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn write_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("labs.yaml");

        Fixture::sample().write(&path).unwrap();
        assert_eq!(Fixture::read(&path).unwrap(), Fixture::sample());
    }

    #[tokio::test]
    async fn store_snapshot_matches_source() {
        let fixture = Fixture::sample();
        let store = fixture.clone().into_store().await.unwrap();
        assert_eq!(store.find_by_id(10).await.unwrap().name, "AI Lab");
        assert_eq!(Fixture::snapshot(&store).await, fixture);
    }
}
