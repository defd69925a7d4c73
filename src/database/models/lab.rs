use serde::{Deserialize, Serialize};

use crate::database::models::user::User;
use crate::types::{LabId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lab {
    pub id: LabId,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub introduction: String,
    /// Set once at creation. Never rewritten by updates.
    pub professor_id: UserId,
}

/// Mutable lab fields as supplied by a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabFields {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub introduction: String,
}

/// Update request: the target lab plus its new mutable fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLab {
    pub id: LabId,
    #[serde(flatten)]
    pub fields: LabFields,
}

/// A lab that has been built but not yet persisted, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLab {
    pub name: String,
    pub category: String,
    pub introduction: String,
    pub professor_id: UserId,
}

impl NewLab {
    pub fn new(fields: LabFields, professor_id: UserId) -> Self {
        Self {
            name: fields.name,
            category: fields.category,
            introduction: fields.introduction,
            professor_id,
        }
    }

    pub fn into_lab(self, id: LabId) -> Lab {
        Lab {
            id,
            name: self.name,
            category: self.category,
            introduction: self.introduction,
            professor_id: self.professor_id,
        }
    }
}

impl Lab {
    /// Overwrite the caller-editable fields, leaving id and owner alone.
    pub fn apply(&mut self, fields: LabFields) {
        self.name = fields.name;
        self.category = fields.category;
        self.introduction = fields.introduction;
    }
}

#[derive(Debug, Clone)]
pub struct LabWithResearchers {
    pub lab: Lab,
    /// Ids of users whose membership points at this lab, in id order.
    pub researcher_ids: Vec<UserId>,
}

#[derive(Debug, Clone)]
pub struct LabWithProfessor {
    pub lab: Lab,
    pub professor: User,
}

#[derive(Debug, Clone)]
pub struct LabWithMembers {
    pub lab: Lab,
    pub professor: User,
    pub researcher_ids: Vec<UserId>,
}

/// Search criteria for lab listings.
///
/// `name` is a case-insensitive substring match, `category` is exact.
/// Results are ordered by lab id ascending, then paged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabSearch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl LabSearch {
    pub fn matches(&self, lab: &Lab) -> bool {
        if let Some(name) = &self.name {
            if !lab.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &lab.category != category {
                return false;
            }
        }
        true
    }

    /// Clamp the page size to `max`. A missing limit becomes `max`.
    pub fn capped(mut self, max: Option<usize>) -> Self {
        if let Some(max) = max {
            self.limit = Some(self.limit.map_or(max, |limit| limit.min(max)));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lab(name: &str, category: &str) -> Lab {
        Lab {
            id: 1,
            name: name.to_string(),
            category: category.to_string(),
            introduction: String::new(),
            professor_id: 1,
        }
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let search = LabSearch {
            name: Some("vision".to_string()),
            ..Default::default()
        };
        assert!(search.matches(&lab("Computer Vision Lab", "ai")));
        assert!(!search.matches(&lab("Systems Lab", "ai")));
    }

    #[test]
    fn search_matches_category_exactly() {
        let search = LabSearch {
            category: Some("ai".to_string()),
            ..Default::default()
        };
        assert!(search.matches(&lab("Any", "ai")));
        assert!(!search.matches(&lab("Any", "AI")));
    }

    #[test]
    fn capped_limits_page_size() {
        let search = LabSearch {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(search.clone().capped(Some(100)).limit, Some(100));
        assert_eq!(search.capped(None).limit, Some(500));
        assert_eq!(LabSearch::default().capped(Some(50)).limit, Some(50));
    }

    #[test]
    fn apply_keeps_owner() {
        let mut existing = lab("Old", "ai");
        existing.apply(LabFields {
            name: "New".to_string(),
            category: "systems".to_string(),
            introduction: "hello".to_string(),
        });
        assert_eq!(existing.name, "New");
        assert_eq!(existing.category, "systems");
        assert_eq!(existing.professor_id, 1);
    }
}
