//! Goal category catalog.
//!
//! # Responsibility
//! - Define the closed set of five goal categories.
//! - Map each category to its display color and icon keys.
//!
//! # Invariants
//! - Wire labels are the Portuguese display labels stored by the backend.
//! - `Category::ALL` order is the order shown by the creation form.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Closed category enumeration for goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Saúde")]
    Health,
    #[serde(rename = "Trabalho")]
    Work,
    #[default]
    #[serde(rename = "Pessoal")]
    Personal,
    #[serde(rename = "Estudos")]
    Studies,
    #[serde(rename = "Finanças")]
    Finances,
}

/// Returned when a label does not name one of the five categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl Display for UnknownCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown goal category `{}`", self.0)
    }
}

impl Error for UnknownCategory {}

impl Category {
    /// All categories in creation-form order.
    pub const ALL: [Category; 5] = [
        Category::Health,
        Category::Work,
        Category::Personal,
        Category::Studies,
        Category::Finances,
    ];

    /// Wire and display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Health => "Saúde",
            Self::Work => "Trabalho",
            Self::Personal => "Pessoal",
            Self::Studies => "Estudos",
            Self::Finances => "Finanças",
        }
    }

    /// Palette key the UI shell maps to its badge colors.
    pub fn color_key(self) -> &'static str {
        match self {
            Self::Health => "rose",
            Self::Work => "blue",
            Self::Personal => "purple",
            Self::Studies => "amber",
            Self::Finances => "emerald",
        }
    }

    /// Icon key the UI shell maps to a glyph.
    pub fn icon_key(self) -> &'static str {
        match self {
            Self::Health => "heart",
            Self::Work => "briefcase",
            Self::Personal => "user",
            Self::Studies => "book_open",
            Self::Finances => "credit_card",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label() == trimmed)
            .ok_or_else(|| UnknownCategory(trimmed.to_string()))
    }
}
