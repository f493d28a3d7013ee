//! Completed-goal history ("Histórico").

use crate::model::goal::Goal;
use crate::view::goal_list::GoalRowView;

pub const EMPTY_TEXT: &str = "Nenhum histórico disponível.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryView {
    /// Completed goals in cache order.
    pub rows: Vec<GoalRowView>,
    pub empty_text: Option<&'static str>,
}

impl HistoryView {
    pub fn build(goals: &[Goal]) -> Self {
        let rows = goals
            .iter()
            .filter(|goal| goal.completed)
            .map(GoalRowView::from)
            .collect::<Vec<_>>();
        Self {
            empty_text: rows.is_empty().then_some(EMPTY_TEXT),
            rows,
        }
    }
}
