use serde::{Deserialize, Serialize};

use crate::database::models::{Lab, User};
use crate::types::{LabId, UserId};

/// Public fields of a lab's owning professor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorInfo {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for ProfessorInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Public fields of a lab member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearcherInfo {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for ResearcherInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// One row of a lab listing: the lab paired with its professor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabSummary {
    pub id: LabId,
    pub name: String,
    pub category: String,
    pub introduction: String,
    pub professor: ProfessorInfo,
}

impl LabSummary {
    pub fn new(lab: &Lab, professor: &User) -> Self {
        Self {
            id: lab.id,
            name: lab.name.clone(),
            category: lab.category.clone(),
            introduction: lab.introduction.clone(),
            professor: professor.into(),
        }
    }
}

/// Lab detail as seen by a particular caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabDetail {
    pub id: LabId,
    pub name: String,
    pub category: String,
    pub introduction: String,
    pub professor: ProfessorInfo,
    /// Members of the lab, professors excluded
    pub researchers: Vec<ResearcherInfo>,
    pub is_subscribed: bool,
}

impl LabDetail {
    pub fn new(lab: &Lab, professor: &User, researchers: &[User], is_subscribed: bool) -> Self {
        Self {
            id: lab.id,
            name: lab.name.clone(),
            category: lab.category.clone(),
            introduction: lab.introduction.clone(),
            professor: professor.into(),
            researchers: researchers.iter().map(ResearcherInfo::from).collect(),
            is_subscribed,
        }
    }
}

/// Success marker returned by mutating operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub ok: bool,
}

impl Ack {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}
