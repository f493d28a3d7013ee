//! Progress card shown above the goal list.

use crate::model::goal::Goal;

/// Aggregate completion figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsCard {
    pub completed: usize,
    pub total: usize,
    pub pending: usize,
    /// Whole percent, rounded half up; 0 when there are no goals.
    pub percentage: u32,
}

impl StatsCard {
    pub fn build(goals: &[Goal]) -> Self {
        let total = goals.len();
        let completed = completed_count(goals);
        Self {
            completed,
            total,
            pending: total - completed,
            percentage: percentage(completed, total),
        }
    }

    pub fn title(&self) -> &'static str {
        "Progresso Diário"
    }

    pub fn summary(&self) -> String {
        format!("{} de {} metas finalizadas", self.completed, self.total)
    }
}

/// Number of completed goals.
pub fn completed_count(goals: &[Goal]) -> usize {
    goals.iter().filter(|goal| goal.completed).count()
}

fn percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // Integer round-half-up of completed * 100 / total.
    ((completed * 200 + total) / (total * 2)) as u32
}

#[cfg(test)]
mod tests {
    use super::percentage;

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(5, 5), 100);
    }
}
