//! View models rendered by the UI shell.
//!
//! # Responsibility
//! - Derive every screen from cache and session snapshots.
//! - Hold only transient form input; everything else is recomputed.
//!
//! # Invariants
//! - Builders are pure functions of their inputs.
//! - Exactly one `Tab` is active; the creation form is a separate overlay.

pub mod achievements;
pub mod form;
pub mod goal_list;
pub mod header;
pub mod history;
pub mod settings;
pub mod stats;

/// Bottom navigation tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tab {
    #[default]
    Goals,
    History,
    Achievements,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Goals, Tab::History, Tab::Achievements, Tab::Settings];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Goals => "Metas",
            Self::History => "Histórico",
            Self::Achievements => "Conquistas",
            Self::Settings => "Ajustes",
        }
    }

    pub fn icon_key(self) -> &'static str {
        match self {
            Self::Goals => "list_todo",
            Self::History => "calendar",
            Self::Achievements => "trophy",
            Self::Settings => "settings",
        }
    }

    /// Stable key used across the FFI boundary.
    pub fn key(self) -> &'static str {
        match self {
            Self::Goals => "metas",
            Self::History => "historico",
            Self::Achievements => "conquistas",
            Self::Settings => "ajustes",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.key() == key.trim())
    }
}
