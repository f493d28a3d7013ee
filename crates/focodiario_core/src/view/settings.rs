//! Account settings ("Ajustes").

use crate::model::identity::Identity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsView {
    pub display_name: String,
    pub email: String,
    pub logout_label: &'static str,
    pub logout_hint: &'static str,
}

impl SettingsView {
    pub fn build(identity: &Identity) -> Self {
        Self {
            display_name: identity.display_name().to_string(),
            email: identity.email.clone(),
            logout_label: "Sair",
            logout_hint: "Desconectar conta",
        }
    }
}
