//! Session and role resolution from identity tokens
//!
//! The resolver is fail-closed: a missing, malformed, expired or badly
//! signed token resolves to an unauthenticated session, and nothing resolves
//! at all until a token verifier has been installed.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::roles::{Permission, Role, RoleSet};
use crate::error::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
struct RoleClaim {
    #[serde(default)]
    roles: Vec<String>,
}

/// Claims the console reads from a Keycloak access token
#[derive(Debug, Deserialize)]
struct IdentityClaims {
    preferred_username: Option<String>,
    exp: i64,
    #[serde(default)]
    realm_access: Option<RoleClaim>,
    #[serde(default)]
    resource_access: HashMap<String, RoleClaim>,
}

/// Bearer credential attached to backend calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    pub fn expires_within(&self, window: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at - now <= window
    }
}

/// Authenticated identity and role set for one console request
#[derive(Debug, Clone)]
pub struct Session {
    username: String,
    roles: RoleSet,
    raw_roles: Vec<String>,
    credentials: Option<Credentials>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self {
            username: "guest".to_string(),
            roles: RoleSet::empty(),
            raw_roles: Vec::new(),
            credentials: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.roles.contains(Role::Admin)
    }

    pub fn is_user(&self) -> bool {
        self.is_authenticated() && self.roles.contains(Role::User)
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.is_authenticated() && self.roles.can(permission)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.credentials.as_ref().map(|c| c.expires_at)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            authenticated: self.is_authenticated(),
            username: self.username.clone(),
            roles: self.raw_roles.clone(),
            is_admin: self.is_admin(),
            is_user: self.is_user(),
            expires_at: self.expires_at(),
        }
    }
}

/// Session information exposed to the console header
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionSummary {
    pub authenticated: bool,
    pub username: String,
    /// Normalized role strings, including roles the console does not act on
    pub roles: Vec<String>,
    pub is_admin: bool,
    pub is_user: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Result of resolving a request's identity
#[derive(Debug, Clone)]
pub enum SessionStatus {
    /// The resolver has no verifier yet
    Initializing,
    Resolved(Session),
}

impl SessionStatus {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionStatus::Initializing => None,
            SessionStatus::Resolved(session) => Some(session),
        }
    }
}

struct Verifier {
    key: DecodingKey,
    algorithm: Algorithm,
}

/// Derives sessions from identity tokens issued by the realm
pub struct SessionResolver {
    client_id: String,
    verifier: OnceCell<Verifier>,
}

impl SessionResolver {
    /// Resolver waiting for the realm key
    pub fn pending(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            verifier: OnceCell::new(),
        }
    }

    /// Resolver verifying HS256 tokens signed with a shared secret
    pub fn with_shared_secret(client_id: impl Into<String>, secret: &[u8]) -> Self {
        let resolver = Self::pending(client_id);
        let _ = resolver.verifier.set(Verifier {
            key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        });
        resolver
    }

    /// Install the realm RSA key (base64 DER, as published by the realm endpoint)
    pub fn install_realm_key(&self, public_key: &str) -> AppResult<()> {
        let key = realm_key_from_base64(public_key)?;
        self.verifier
            .set(Verifier {
                key,
                algorithm: Algorithm::RS256,
            })
            .map_err(|_| AppError::Internal("Token verifier already installed".to_string()))
    }

    pub fn is_initialized(&self) -> bool {
        self.verifier.get().is_some()
    }

    pub fn resolve(&self, access_token: Option<&str>, refresh_token: Option<String>) -> SessionStatus {
        let Some(verifier) = self.verifier.get() else {
            return SessionStatus::Initializing;
        };

        let Some(token) = access_token.filter(|t| !t.is_empty()) else {
            return SessionStatus::Resolved(Session::anonymous());
        };

        let mut validation = Validation::new(verifier.algorithm);
        validation.validate_aud = false;
        validation.leeway = 0;

        let claims = match decode::<IdentityClaims>(token, &verifier.key, &validation) {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!("Rejected identity token: {}", e);
                return SessionStatus::Resolved(Session::anonymous());
            }
        };

        SessionStatus::Resolved(self.session_from_claims(claims, token, refresh_token))
    }

    fn session_from_claims(
        &self,
        claims: IdentityClaims,
        token: &str,
        refresh_token: Option<String>,
    ) -> Session {
        let mut raw_roles: Vec<String> = Vec::new();
        let realm_roles = claims.realm_access.map(|r| r.roles).unwrap_or_default();
        let client_roles = claims
            .resource_access
            .get(&self.client_id)
            .map(|r| r.roles.clone())
            .unwrap_or_default();

        for role in realm_roles.into_iter().chain(client_roles) {
            let role = role.to_uppercase();
            if !raw_roles.contains(&role) {
                raw_roles.push(role);
            }
        }

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or_else(Utc::now);

        Session {
            username: claims
                .preferred_username
                .unwrap_or_else(|| "guest".to_string()),
            roles: RoleSet::from_raw(&raw_roles),
            raw_roles,
            credentials: Some(Credentials {
                access_token: token.to_string(),
                refresh_token,
                expires_at,
            }),
        }
    }
}

/// Realm endpoints publish the SubjectPublicKeyInfo as bare base64
fn realm_key_from_base64(public_key: &str) -> AppResult<DecodingKey> {
    let compact: String = public_key.split_whitespace().collect();
    STANDARD
        .decode(&compact)
        .map_err(|e| AppError::Internal(format!("Invalid realm public key: {}", e)))?;

    let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
    for chunk in compact.as_bytes().chunks(64) {
        pem.push_str(&String::from_utf8_lossy(chunk));
        pem.push('\n');
    }
    pem.push_str("-----END PUBLIC KEY-----\n");

    DecodingKey::from_rsa_pem(pem.as_bytes())
        .map_err(|e| AppError::Internal(format!("Invalid realm public key: {}", e)))
}
