//! Authenticated identity and session records.
//!
//! # Invariants
//! - A `Session` always carries a non-empty access token.
//! - Sessions live in memory only; the identity provider owns persistence.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Authenticated principal as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque owner id that scopes remote rows.
    pub id: String,
    /// Email-shaped login identifier.
    pub email: String,
    /// `display_name` attribute set at sign-up, if any.
    pub display_name: Option<String>,
}

impl Identity {
    /// Name shown in the header and settings.
    ///
    /// Falls back to the local part of the email when no display name is set.
    pub fn display_name(&self) -> &str {
        match self.display_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => self
                .email
                .split_once('@')
                .map(|(local, _)| local)
                .unwrap_or(self.email.as_str()),
        }
    }
}

/// Active session issued by the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub identity: Identity,
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn owner_id(&self) -> &str {
        &self.identity.id
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // Tokens stay out of debug output.
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Email/password pair sent to the identity provider.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
