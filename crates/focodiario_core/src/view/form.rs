//! Transient form state for goal creation and authentication.
//!
//! # Invariants
//! - The goal form is cleared on successful submit or dismissal and kept
//!   intact when a submit fails.
//! - The auth form clears its error at the start of every submit.

use crate::model::category::Category;

/// Creation overlay ("Nova Meta").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalForm {
    pub open: bool,
    pub title: String,
    pub category: Category,
}

impl GoalForm {
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Closes the overlay and discards the input.
    pub fn dismiss(&mut self) {
        *self = Self::default();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn select_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn can_submit(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Category choices with the current selection flagged.
    pub fn category_options(&self) -> Vec<(Category, bool)> {
        Category::ALL
            .into_iter()
            .map(|category| (category, category == self.category))
            .collect()
    }
}

/// Sign-in/sign-up screen ("Entrar ou Criar Conta").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub username: String,
    pub password: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthForm {
    /// Marks a submit as started.
    pub fn begin_submit(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Records the submit result; success clears the inputs.
    pub fn finish_submit(&mut self, error: Option<String>) {
        self.loading = false;
        match error {
            Some(message) => self.error = Some(message),
            None => *self = Self::default(),
        }
    }
}
