//! Application configuration model.

use crate::session::{Environment, UserRole};
use crate::state::DEFAULT_USER;
use serde::{Deserialize, Serialize};

/// Startup configuration, read from `config.toml`.
///
/// Provides the identity a new session is started with when no persisted
/// session exists.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Display name of the user
    #[serde(default = "default_user")]
    pub user: String,
    /// Access role
    #[serde(default)]
    pub role: UserRole,
    /// Environment to answer questions about
    #[serde(default)]
    pub environment: Environment,
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user: default_user(),
            role: UserRole::default(),
            environment: Environment::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.user, DEFAULT_USER);
        assert_eq!(config.role, UserRole::User);
        assert_eq!(config.environment, Environment::Dev);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = toml::from_str("user = \"alice\"").unwrap();
        assert_eq!(config.user, "alice");
        assert_eq!(config.role, UserRole::User);
        assert_eq!(config.environment, Environment::Dev);
    }
}
