//! Enum types for Fintra records

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error when parsing an unknown database string into one of the enums below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumParseError {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {}: {}", self.kind, self.value)
    }
}

impl std::error::Error for EnumParseError {}

macro_rules! db_str_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.as_db_str())
            }
        }

        impl FromStr for $ty {
            type Err = EnumParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_db_str(s)
            }
        }
    };
}

// ============================================================================
// WORKSPACES
// ============================================================================

/// Kind of workspace. Membership management only applies to organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceType {
    Personal,
    Organization,
}

impl WorkspaceType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            WorkspaceType::Personal => "personal",
            WorkspaceType::Organization => "organization",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
        match s.to_lowercase().as_str() {
            "personal" => Ok(WorkspaceType::Personal),
            "organization" => Ok(WorkspaceType::Organization),
            _ => Err(EnumParseError {
                kind: "workspace type",
                value: s.to_string(),
            }),
        }
    }
}

db_str_traits!(WorkspaceType);

/// Role of the current user (or a member) inside a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(MemberRole::Admin),
            "member" => Ok(MemberRole::Member),
            _ => Err(EnumParseError {
                kind: "member role",
                value: s.to_string(),
            }),
        }
    }

    pub fn can_manage_members(&self) -> bool {
        matches!(self, MemberRole::Admin)
    }
}

db_str_traits!(MemberRole);

// ============================================================================
// GOALS AND PAYMENTS
// ============================================================================

/// Progress status of a savings goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GoalStatus {
    #[default]
    Pending,
    #[serde(rename = "In-progress")]
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            GoalStatus::Pending => "Pending",
            GoalStatus::InProgress => "In-progress",
            GoalStatus::Completed => "Completed",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(GoalStatus::Pending),
            "in-progress" | "in_progress" | "inprogress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            _ => Err(EnumParseError {
                kind: "goal status",
                value: s.to_string(),
            }),
        }
    }
}

db_str_traits!(GoalStatus);

/// How a goal or EMI payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentType {
    #[default]
    #[serde(rename = "One-Time")]
    OneTime,
    #[serde(rename = "SIP")]
    Sip,
}

impl PaymentType {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            PaymentType::OneTime => "One-Time",
            PaymentType::Sip => "SIP",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
        match s.to_lowercase().as_str() {
            "one-time" | "one_time" | "onetime" => Ok(PaymentType::OneTime),
            "sip" => Ok(PaymentType::Sip),
            _ => Err(EnumParseError {
                kind: "payment type",
                value: s.to_string(),
            }),
        }
    }
}

db_str_traits!(PaymentType);

// ============================================================================
// ACCOUNTS
// ============================================================================

/// Known account kinds. Accounts store their type as free text, so
/// unrecognized strings are kept on the record and classified as assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
    #[serde(rename = "Credit Card")]
    CreditCard,
    Investment,
    Loan,
    Other,
}

impl AccountType {
    pub const ALL: [AccountType; 6] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::CreditCard,
        AccountType::Investment,
        AccountType::Loan,
        AccountType::Other,
    ];

    pub fn as_db_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::CreditCard => "Credit Card",
            AccountType::Investment => "Investment",
            AccountType::Loan => "Loan",
            AccountType::Other => "Other",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
        match s.to_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "credit card" => Ok(AccountType::CreditCard),
            "investment" => Ok(AccountType::Investment),
            "loan" => Ok(AccountType::Loan),
            "other" => Ok(AccountType::Other),
            _ => Err(EnumParseError {
                kind: "account type",
                value: s.to_string(),
            }),
        }
    }

    /// Credit cards and loans count against net worth.
    pub fn is_liability(&self) -> bool {
        matches!(self, AccountType::CreditCard | AccountType::Loan)
    }

    /// Default icon name shown next to accounts of this type.
    pub fn icon_name(&self) -> &'static str {
        match self {
            AccountType::Checking => "Wallet",
            AccountType::Savings => "PiggyBank",
            AccountType::CreditCard => "CreditCard",
            AccountType::Investment => "TrendingUp",
            AccountType::Loan => "CircleDollarSign",
            AccountType::Other => "Briefcase",
        }
    }
}

db_str_traits!(AccountType);

// ============================================================================
// ANALYTICS
// ============================================================================

/// Bucket size for net-worth history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NetWorthInterval {
    Day,
    Week,
    #[default]
    Month,
}

impl NetWorthInterval {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            NetWorthInterval::Day => "day",
            NetWorthInterval::Week => "week",
            NetWorthInterval::Month => "month",
        }
    }

    pub fn from_db_str(s: &str) -> Result<Self, EnumParseError> {
        match s.to_lowercase().as_str() {
            "day" => Ok(NetWorthInterval::Day),
            "week" => Ok(NetWorthInterval::Week),
            "month" => Ok(NetWorthInterval::Month),
            _ => Err(EnumParseError {
                kind: "net worth interval",
                value: s.to_string(),
            }),
        }
    }
}

db_str_traits!(NetWorthInterval);

/// Expense categories offered when recording an expense.
pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "Groceries",
    "Utilities",
    "Transport",
    "Entertainment",
    "Healthcare",
    "Dining",
    "Shopping",
    "EMI",
    "Financial Goals",
    "Other",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_status_wire_format() {
        let json = serde_json::to_string(&GoalStatus::InProgress).unwrap();
        assert_eq!(json, "\"In-progress\"");
        let parsed: GoalStatus = serde_json::from_str("\"Completed\"").unwrap();
        assert_eq!(parsed, GoalStatus::Completed);
        assert_eq!("in-progress".parse::<GoalStatus>().unwrap(), GoalStatus::InProgress);
    }

    #[test]
    fn test_payment_type_wire_format() {
        assert_eq!(serde_json::to_string(&PaymentType::OneTime).unwrap(), "\"One-Time\"");
        assert_eq!(serde_json::to_string(&PaymentType::Sip).unwrap(), "\"SIP\"");
        assert_eq!(PaymentType::from_db_str("sip").unwrap(), PaymentType::Sip);
    }

    #[test]
    fn test_workspace_type_and_role() {
        assert_eq!(
            serde_json::from_str::<WorkspaceType>("\"organization\"").unwrap(),
            WorkspaceType::Organization
        );
        assert_eq!(WorkspaceType::Personal.to_string(), "personal");
        assert!(MemberRole::Admin.can_manage_members());
        assert!(!MemberRole::Member.can_manage_members());
    }

    #[test]
    fn test_account_type_liabilities() {
        let liabilities: Vec<_> = AccountType::ALL
            .iter()
            .filter(|t| t.is_liability())
            .collect();
        assert_eq!(liabilities, vec![&AccountType::CreditCard, &AccountType::Loan]);
        assert_eq!(
            AccountType::from_db_str("Credit Card").unwrap(),
            AccountType::CreditCard
        );
    }

    #[test]
    fn test_unknown_values_rejected() {
        let err = MemberRole::from_db_str("owner").unwrap_err();
        assert_eq!(err.to_string(), "Invalid member role: owner");
        assert!(NetWorthInterval::from_db_str("year").is_err());
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    fn account_type_strategy() -> impl Strategy<Value = AccountType> {
        prop::sample::select(AccountType::ALL.to_vec())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// Property: db string and serde representations agree.
        #[test]
        fn prop_account_type_db_str_matches_serde(account_type in account_type_strategy()) {
            let json = serde_json::to_string(&account_type).unwrap();
            prop_assert_eq!(json, format!("\"{}\"", account_type.as_db_str()));
            prop_assert_eq!(AccountType::from_db_str(account_type.as_db_str()).unwrap(), account_type);
        }
    }
}
