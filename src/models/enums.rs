//! Shared domain enums (wire values follow the ToolRent backend)

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// ToolStatus
// ---------------------------------------------------------------------------

/// Tool lifecycle status, driven by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolStatus {
    Available,
    Repairing,
    Loaned,
    Decommissioned,
}

impl ToolStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolStatus::Available => "AVAILABLE",
            ToolStatus::Repairing => "REPAIRING",
            ToolStatus::Loaned => "LOANED",
            ToolStatus::Decommissioned => "DECOMMISSIONED",
        }
    }
}

impl std::fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ClientStatus
// ---------------------------------------------------------------------------

/// Client standing, decided by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientStatus {
    Active,
    Restricted,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "ACTIVE",
            ClientStatus::Restricted => "RESTRICTED",
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LoanStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Active,
    Late,
    Returned,
    /// Returned with an outstanding penalty
    Received,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Late => "LATE",
            LoanStatus::Returned => "RETURNED",
            LoanStatus::Received => "RECEIVED",
        }
    }

    /// Label shown in the loan list
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Active => "Active",
            LoanStatus::Late => "Late",
            LoanStatus::Returned => "Returned",
            LoanStatus::Received => "Received",
        }
    }

    /// Only open loans can go through the return form
    pub fn is_returnable(&self) -> bool {
        matches!(self, LoanStatus::Active | LoanStatus::Late)
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MovementType
// ---------------------------------------------------------------------------

/// Kardex movement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Income,
    Loan,
    Return,
    Repair,
    Decommission,
    ManualDecrease,
}

impl std::fmt::Display for MovementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MovementType::Income => "INCOME",
            MovementType::Loan => "LOAN",
            MovementType::Return => "RETURN",
            MovementType::Repair => "REPAIR",
            MovementType::Decommission => "DECOMMISSION",
            MovementType::ManualDecrease => "MANUAL_DECREASE",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_use_screaming_wire_names() {
        assert_eq!(serde_json::to_string(&ToolStatus::Decommissioned).unwrap(), "\"DECOMMISSIONED\"");
        assert_eq!(
            serde_json::from_str::<MovementType>("\"MANUAL_DECREASE\"").unwrap(),
            MovementType::ManualDecrease
        );
        assert_eq!(serde_json::from_str::<LoanStatus>("\"RECEIVED\"").unwrap(), LoanStatus::Received);
    }

    #[test]
    fn only_open_loans_are_returnable() {
        assert!(LoanStatus::Active.is_returnable());
        assert!(LoanStatus::Late.is_returnable());
        assert!(!LoanStatus::Returned.is_returnable());
        assert!(!LoanStatus::Received.is_returnable());
    }
}
