#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::Arc;

use anyhow::{Context, Result};
use lab_service_rust::database::models::{Lab, LabFields, User};
use lab_service_rust::database::{LabRepository, UserRepository};
use lab_service_rust::types::{LabId, Role, UserId};
use lab_service_rust::{LabService, MemoryStore};
use serde_json::Value;

/// A store seeded for one test plus a service wired to it
pub struct World {
    pub store: Arc<MemoryStore>,
    pub service: LabService,
}

impl World {
    pub async fn new(users: &[(UserId, Role, Option<LabId>)], labs: &[(LabId, &str, UserId)]) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        for &(id, role, lab_id) in users {
            store.insert_user(user(id, role, lab_id)).await?;
        }
        for &(id, name, professor_id) in labs {
            store.insert_lab(lab(id, name, professor_id)).await?;
        }
        let service = LabService::from_store(store.clone());
        Ok(Self { store, service })
    }

    pub async fn lab(&self, id: LabId) -> Result<Lab> {
        Ok(LabRepository::find_by_id(self.store.as_ref(), id).await?)
    }

    pub async fn user(&self, id: UserId) -> Result<User> {
        Ok(UserRepository::find_by_id(self.store.as_ref(), id).await?)
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
        category: "general".to_string(),
        introduction: String::new(),
        professor_id,
    }
}

pub fn fields(name: &str) -> LabFields {
    LabFields {
        name: name.to_string(),
        ..Default::default()
    }
}

/// Runs the built `labctl` binary against a fixture in a scratch directory
pub struct Labctl {
    _dir: tempfile::TempDir,
    pub fixture: PathBuf,
}

impl Labctl {
    pub fn new(file_name: &str) -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create scratch directory")?;
        let fixture = dir.path().join(file_name);
        Ok(Self { _dir: dir, fixture })
    }

    pub fn run(&self, args: &[&str]) -> Result<Output> {
        Command::new(env!("CARGO_BIN_EXE_labctl"))
            .arg("--fixture")
            .arg(&self.fixture)
            .args(args)
            .env("RUST_LOG", "off")
            .env_remove("LAB_CALLER")
            .env_remove("LAB_FIXTURE")
            .output()
            .context("failed to spawn labctl")
    }

    /// Run with `--json` and parse stdout
    pub fn json(&self, args: &[&str]) -> Result<(bool, Value)> {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full)?;
        let body: Value = serde_json::from_slice(&output.stdout).with_context(|| {
            format!(
                "stdout was not JSON: {}",
                String::from_utf8_lossy(&output.stdout)
            )
        })?;
        Ok((output.status.success(), body))
    }
}
