//! Username to login-email adapter.
//!
//! The identity provider only accepts email-shaped identifiers, so every
//! username is mapped to a synthetic address under a fixed domain. This is the
//! only place that mapping exists.
//!
//! # Invariants
//! - Mapping is stable: same username, same email.
//! - Case and whitespace differences collapse to one account.

use once_cell::sync::Lazy;
use regex::Regex;

/// Domain appended to every derived login email.
pub const LOGIN_EMAIL_DOMAIN: &str = "focodiario.com";

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Derives the login email for `username`.
///
/// The username is trimmed, lowercased and stripped of all whitespace.
pub fn derive_login_email(username: &str) -> String {
    let lowered = username.trim().to_lowercase();
    let local = WHITESPACE_RE.replace_all(&lowered, "");
    format!("{local}@{LOGIN_EMAIL_DOMAIN}")
}
