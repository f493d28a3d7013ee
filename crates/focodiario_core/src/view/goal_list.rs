//! Main goal list ("Metas").

use crate::model::goal::{Goal, GoalId};
use crate::view::stats::StatsCard;

pub const EMPTY_TEXT: &str = "Nada por aqui. Adicione uma meta!";

/// One rendered goal row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalRowView {
    pub id: GoalId,
    pub title: String,
    pub category_label: &'static str,
    pub category_color: &'static str,
    pub category_icon: &'static str,
    pub completed: bool,
}

impl From<&Goal> for GoalRowView {
    fn from(goal: &Goal) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            category_label: goal.category.label(),
            category_color: goal.category.color_key(),
            category_icon: goal.category.icon_key(),
            completed: goal.completed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalListView {
    pub stats: StatsCard,
    pub rows: Vec<GoalRowView>,
    /// Set when `rows` is empty.
    pub empty_text: Option<&'static str>,
}

impl GoalListView {
    pub fn build(goals: &[Goal]) -> Self {
        let rows = goals.iter().map(GoalRowView::from).collect::<Vec<_>>();
        Self {
            stats: StatsCard::build(goals),
            empty_text: rows.is_empty().then_some(EMPTY_TEXT),
            rows,
        }
    }

    /// Heading badge, e.g. `3 total`.
    pub fn count_label(&self) -> String {
        format!("{} total", self.rows.len())
    }
}
