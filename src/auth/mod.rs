//! Identity: Keycloak sessions, typed roles and permissions

pub mod keycloak;
pub mod roles;
pub mod session;

pub use keycloak::{load_realm_key, KeycloakClient, TokenRefresher, TokenSet};
pub use roles::{Permission, Role, RoleSet};
pub use session::{Credentials, Session, SessionResolver, SessionStatus, SessionSummary};
