//! Configuration management for the ToolRent console

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// ToolRent REST backend the console talks to
#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// How identity tokens are verified
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenSigning {
    /// RS256 with the realm public key published by Keycloak
    RealmKey,
    /// HS256 with a secret shared with the identity provider
    SharedSecret,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeycloakConfig {
    pub url: String,
    pub realm: String,
    pub client_id: String,
    /// Credentials expiring within this window are refreshed before a backend call
    pub refresh_lookahead_secs: u64,
    pub signing: TokenSigning,
    pub shared_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub keycloak: KeycloakConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Environment variables, e.g. TOOLRENT_KEYCLOAK__CLIENT_ID
            .add_source(
                Environment::with_prefix("TOOLRENT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("backend.base_url", env::var("BACKEND_URL").ok())?
            .set_override_option("keycloak.url", env::var("KEYCLOAK_URL").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl KeycloakConfig {
    /// Issuer base for the configured realm
    pub fn realm_url(&self) -> String {
        format!("{}/realms/{}", self.url.trim_end_matches('/'), self.realm)
    }

    pub fn token_endpoint(&self) -> String {
        format!("{}/protocol/openid-connect/token", self.realm_url())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5173,
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 15,
        }
    }
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8090".to_string(),
            realm: "toolrent-realm".to_string(),
            client_id: "toolrent-client".to_string(),
            refresh_lookahead_secs: 5,
            signing: TokenSigning::RealmKey,
            shared_secret: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realm_endpoints_are_derived_from_base_url() {
        let keycloak = KeycloakConfig {
            url: "http://localhost:8090/".to_string(),
            ..KeycloakConfig::default()
        };

        assert_eq!(keycloak.realm_url(), "http://localhost:8090/realms/toolrent-realm");
        assert_eq!(
            keycloak.token_endpoint(),
            "http://localhost:8090/realms/toolrent-realm/protocol/openid-connect/token"
        );
    }

    #[test]
    fn defaults_use_five_second_refresh_window() {
        let config = AppConfig::default();
        assert_eq!(config.keycloak.refresh_lookahead_secs, 5);
        assert_eq!(config.keycloak.signing, TokenSigning::RealmKey);
    }
}
