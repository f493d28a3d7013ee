//! Goal domain model.
//!
//! # Responsibility
//! - Define the goal record mirrored from the remote `goals` collection.
//! - Define the create request sent before a goal has an identity.
//!
//! # Invariants
//! - `id` is opaque and unique within one session's cache.
//! - `created_at_ms` is set by the remote store and never changes.

use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque goal identifier assigned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GoalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One trackable goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub category: Category,
    pub completed: bool,
    /// Unix epoch milliseconds.
    pub created_at_ms: i64,
}

/// Create request for a goal not yet stored remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub title: String,
    pub category: Category,
}

impl NewGoal {
    /// Builds a create request, trimming the title.
    ///
    /// Returns `None` when the trimmed title is empty.
    pub fn new(title: &str, category: Category) -> Option<Self> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            title: trimmed.to_string(),
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, NewGoal};

    #[test]
    fn new_goal_trims_title() {
        let draft = NewGoal::new("  Correr 5km ", Category::Health).expect("valid title");
        assert_eq!(draft.title, "Correr 5km");
    }

    #[test]
    fn new_goal_rejects_blank_title() {
        assert!(NewGoal::new("", Category::Work).is_none());
        assert!(NewGoal::new(" \t\n", Category::Work).is_none());
    }
}
