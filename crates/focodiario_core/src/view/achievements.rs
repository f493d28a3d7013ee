//! Achievement badges ("Conquistas").
//!
//! Badges are thresholds over the completed-goal count; nothing is stored.

use crate::model::goal::Goal;
use crate::view::stats::completed_count;

/// Static badge definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSpec {
    pub title: &'static str,
    pub icon_key: &'static str,
    pub color_key: &'static str,
    /// Completed goals needed to unlock.
    pub threshold: usize,
}

pub const BADGES: [BadgeSpec; 2] = [
    BadgeSpec {
        title: "Iniciante",
        icon_key: "award",
        color_key: "amber",
        threshold: 1,
    },
    BadgeSpec {
        title: "Constante",
        icon_key: "star",
        color_key: "indigo",
        threshold: 5,
    },
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub spec: BadgeSpec,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementsView {
    pub completed: usize,
    pub badges: Vec<BadgeView>,
}

impl AchievementsView {
    pub fn build(goals: &[Goal]) -> Self {
        Self::for_completed(completed_count(goals))
    }

    pub fn for_completed(completed: usize) -> Self {
        let badges = BADGES
            .iter()
            .map(|spec| BadgeView {
                spec: *spec,
                unlocked: completed >= spec.threshold,
            })
            .collect();
        Self { completed, badges }
    }

    pub fn unlocked_count(&self) -> usize {
        self.badges.iter().filter(|badge| badge.unlocked).count()
    }
}

#[cfg(test)]
mod tests {
    use super::AchievementsView;

    #[test]
    fn thresholds_are_inclusive() {
        let unlocked = |completed| AchievementsView::for_completed(completed).unlocked_count();
        assert_eq!(unlocked(0), 0);
        assert_eq!(unlocked(1), 1);
        assert_eq!(unlocked(4), 1);
        assert_eq!(unlocked(5), 2);
    }
}
