//! Typed roles and the capabilities they grant

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Realm roles the console understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// Parse a role string from a token; matching ignores case
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "ADMIN" => Some(Role::Admin),
            "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn permissions(&self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::Admin => &[
                RegisterTools,
                EditTools,
                ManageInventory,
                ManageLoans,
                ManageClients,
                ManageClientStatus,
                SettleDebts,
                ManageTariffs,
                ViewReports,
                ViewKardex,
            ],
            Role::User => &[
                RegisterTools,
                ManageLoans,
                SettleDebts,
                ViewReports,
                ViewKardex,
            ],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capabilities checked by the route guard and by role-gated page actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Register new tools
    RegisterTools,
    /// Edit tool name, category and replacement value
    EditTools,
    /// Decommission tools and adjust stock
    ManageInventory,
    /// Register loans and returns
    ManageLoans,
    /// Client list, registration and edition
    ManageClients,
    /// Restrict and reactivate clients
    ManageClientStatus,
    /// View and pay the debts of a client
    SettleDebts,
    ManageTariffs,
    ViewReports,
    ViewKardex,
}

impl Permission {
    /// Roles that grant this permission, for the restricted-access panel
    pub fn granted_to(&self) -> Vec<Role> {
        [Role::Admin, Role::User]
            .into_iter()
            .filter(|role| role.permissions().contains(self))
            .collect()
    }
}

/// Set of recognized roles held by a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RoleSet(#[schema(value_type = Vec<Role>)] BTreeSet<Role>);

impl RoleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from raw token role strings, dropping unknown ones
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(raw.into_iter().filter_map(|r| Role::parse(r.as_ref())).collect())
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.0.iter().any(|role| role.permissions().contains(&permission))
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roles_are_normalized() {
        let roles = RoleSet::from_raw(["admin", "offline_access", "User", "uma_authorization"]);
        assert!(roles.contains(Role::Admin));
        assert!(roles.contains(Role::User));
        assert_eq!(roles.iter().count(), 2);
    }

    #[test]
    fn user_cannot_manage_tariffs_or_clients() {
        let roles = RoleSet::from_raw(["USER"]);
        assert!(roles.can(Permission::ManageLoans));
        assert!(roles.can(Permission::ViewKardex));
        assert!(!roles.can(Permission::ManageTariffs));
        assert!(!roles.can(Permission::ManageClients));
        assert!(!roles.can(Permission::EditTools));
    }

    #[test]
    fn only_admin_changes_client_status() {
        let user = RoleSet::from_raw(["USER"]);
        assert!(!user.can(Permission::ManageClientStatus));
        assert!(user.can(Permission::SettleDebts));
        assert_eq!(Permission::ManageClientStatus.granted_to(), vec![Role::Admin]);
        assert!(RoleSet::from_raw(["ADMIN"]).can(Permission::ManageClientStatus));
    }

    #[test]
    fn empty_set_grants_nothing() {
        let roles = RoleSet::empty();
        assert!(!roles.can(Permission::ViewReports));
    }

    #[test]
    fn granted_to_lists_roles_in_order() {
        assert_eq!(Permission::ManageTariffs.granted_to(), vec![Role::Admin]);
        assert_eq!(Permission::ViewReports.granted_to(), vec![Role::Admin, Role::User]);
    }
}
