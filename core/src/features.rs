//! Static feature flags of the linked IRC server

use serde::{Deserialize, Serialize};

/// How the services authenticate new registrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// No verification step
    #[default]
    None,
    /// Registrations are verified by email
    Email,
}

/// Protocol capabilities of the ircd the services are linked to.
///
/// These never change while the process runs; they are read from the
/// `[protocol]` and `[auth]` configuration sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServerFeatures {
    pub uses_halfops: bool,
    pub uses_owner: bool,
    pub uses_protect: bool,
    pub auth: AuthMode,
}

impl ServerFeatures {
    /// Whether any authentication mode is active
    pub fn auth_enabled(&self) -> bool {
        self.auth != AuthMode::None
    }
}
