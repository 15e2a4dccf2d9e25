//! Keycloak realm client: realm key discovery and token refresh

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use super::session::{Credentials, SessionResolver};
use crate::{
    config::KeycloakConfig,
    error::{AppError, AppResult},
};

/// Token endpoint response for the refresh-token grant
#[derive(Debug, Clone, Deserialize)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
}

impl TokenSet {
    /// Credentials for the refreshed token, keeping the previous refresh token
    /// when the provider does not rotate it
    pub fn into_credentials(self, previous_refresh: Option<String>) -> Credentials {
        Credentials {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at: Utc::now() + chrono::Duration::seconds(self.expires_in),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RealmInfo {
    public_key: String,
}

/// Exchanges a refresh token for fresh credentials
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenSet>;
}

#[derive(Clone)]
pub struct KeycloakClient {
    http: reqwest::Client,
    config: KeycloakConfig,
}

impl KeycloakClient {
    pub fn new(config: KeycloakConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create Keycloak client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Fetch the realm RSA public key (base64 DER)
    pub async fn fetch_realm_key(&self) -> AppResult<String> {
        let url = self.config.realm_url();
        tracing::debug!("Fetching realm key from {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::Transport(format!(
                "Realm endpoint returned {}",
                response.status()
            )));
        }

        let realm: RealmInfo = response.json().await?;
        Ok(realm.public_key)
    }
}

#[async_trait]
impl TokenRefresher for KeycloakClient {
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenSet> {
        let response = self
            .http
            .post(self.config.token_endpoint())
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Authentication(format!(
                "Token refresh rejected ({})",
                response.status()
            )));
        }

        Ok(response.json::<TokenSet>().await?)
    }
}

/// Keep fetching the realm key until the resolver accepts one. An
/// unreachable realm and a key that does not parse are both retried, the
/// delay doubling from `initial` up to `max`.
pub async fn load_realm_key<F, Fut>(resolver: &SessionResolver, mut fetch: F, initial: Duration, max: Duration)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<String>>,
{
    let mut delay = initial;
    while !resolver.is_initialized() {
        match fetch().await {
            Ok(key) => match resolver.install_realm_key(&key) {
                Ok(()) => {
                    tracing::info!("Realm key installed, sessions can be resolved");
                    return;
                }
                Err(e) => tracing::error!("Invalid realm key, retrying in {:?}: {}", delay, e),
            },
            Err(e) => tracing::warn!("Realm key not available yet: {}", e),
        }
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refreshed_credentials_keep_previous_refresh_token() {
        let set = TokenSet {
            access_token: "new".to_string(),
            refresh_token: None,
            expires_in: 300,
        };
        let creds = set.into_credentials(Some("old-refresh".to_string()));
        assert_eq!(creds.access_token, "new");
        assert_eq!(creds.refresh_token.as_deref(), Some("old-refresh"));
        assert!(creds.expires_at > Utc::now() + chrono::Duration::seconds(290));
    }

    #[test]
    fn token_set_parses_provider_response() {
        let set: TokenSet = serde_json::from_str(
            r#"{"access_token":"a","expires_in":300,"refresh_expires_in":1800,"refresh_token":"r","token_type":"Bearer"}"#,
        )
        .unwrap();
        assert_eq!(set.refresh_token.as_deref(), Some("r"));
        assert_eq!(set.expires_in, 300);
    }

    const REALM_KEY: &str = "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEArsqrF/huBaLLambZrgrCgbB9teQqzlu1W+qcSoJrLr1SkFtw66HtSSwNSe+TOKaSd+yJOrYAaws0hXFO/tt/H+m4w1q/7+dJlqND7NKXT09ojm7eT+3E65Y1leBpBWrx2wlTN4TYlCKTTmA3+1udGEoVSWMMUBd6wmlpjKjwoO5bEnIlfdb/46N5qh2hHDBD3M5RqLIvl/X/J2ZWwhYSaPCqebv1UxbiaaChpoMe73WPgsOZdRqMO1t6YeWvbbzrRDKMB8N5GkWXl7etfXHncQgoZor+cuxlu0s+EYvvq+Vl1jUKgNFsKZS9fAWLgwDRzft2a5IYcx+nRG7XEWLDUQIDAQAB";

    #[tokio::test]
    async fn invalid_realm_key_is_fetched_again() {
        let resolver = SessionResolver::pending("toolrent-client");
        let mut answers = vec![
            Ok(REALM_KEY.to_string()),
            Ok("%%%".to_string()),
            Err(AppError::Transport("realm down".to_string())),
        ];
        let mut attempts = 0;

        load_realm_key(
            &resolver,
            || {
                attempts += 1;
                let answer = answers.pop().unwrap();
                async move { answer }
            },
            Duration::from_millis(1),
            Duration::from_millis(2),
        )
        .await;

        assert_eq!(attempts, 3);
        assert!(resolver.is_initialized());
    }
}
