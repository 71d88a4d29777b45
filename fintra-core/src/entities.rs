//! Records read from the remote data service.
//!
//! Field names follow the backend's column names so rows deserialize
//! directly. Nested collections (`expense_items`, `goal_payments`,
//! `emi_payments`) are embedded by the read and default to empty.

use crate::enums::{AccountType, GoalStatus, MemberRole, PaymentType, WorkspaceType};
use crate::identity::{EntityId, Money, Timestamp, UserId, WorkspaceId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tenant container. Exactly one is current per client session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    #[serde(rename = "type")]
    pub workspace_type: WorkspaceType,
    pub owner_id: UserId,
    /// Role of the current user in this workspace.
    pub role: MemberRole,
    /// Marks the personal workspace created at sign-up.
    #[serde(default)]
    pub is_initial: bool,
}

impl Workspace {
    pub fn is_organization(&self) -> bool {
        self.workspace_type == WorkspaceType::Organization
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: Money,
    #[serde(default)]
    pub icon_name: String,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub created_at: Timestamp,
}

impl Account {
    /// Parsed account type, `None` for free-text types the client doesn't know.
    pub fn kind(&self) -> Option<AccountType> {
        AccountType::from_db_str(&self.account_type).ok()
    }

    pub fn is_liability(&self) -> bool {
        self.kind().is_some_and(|kind| kind.is_liability())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub id: EntityId,
    pub expense_id: EntityId,
    pub name: String,
    pub price: Money,
    pub quantity: u32,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

impl ExpenseItem {
    pub fn line_total(&self) -> Money {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: EntityId,
    pub title: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub account_id: Option<EntityId>,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub created_at: Timestamp,
    #[serde(default)]
    pub verified: Option<bool>,
    #[serde(default)]
    pub expense_items: Vec<ExpenseItem>,
}

/// Manual credit to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopUp {
    pub id: EntityId,
    pub account_id: EntityId,
    pub amount: Money,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub topup_time: Timestamp,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub created_at: Timestamp,
}

/// Scheduled monthly income credited to an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringIncome {
    pub id: EntityId,
    pub account_id: EntityId,
    pub amount: Money,
    pub name: String,
    pub day_of_month: u8,
    pub is_active: bool,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPayment {
    pub id: EntityId,
    pub goal_id: EntityId,
    pub account_id: EntityId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub payment_type: PaymentType,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

/// Savings goal with its contribution history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub created_at: Timestamp,
    #[serde(default)]
    pub goal_payments: Vec<GoalPayment>,
}

impl Goal {
    /// Fraction of the target reached, clamped to `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiPayment {
    pub id: EntityId,
    pub emi_id: EntityId,
    pub account_id: EntityId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    pub payment_type: PaymentType,
    pub user_id: UserId,
    pub created_at: Timestamp,
}

/// Installment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emi {
    pub id: EntityId,
    pub name: String,
    pub total_amount: Money,
    pub monthly_payment: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub due_date_of_month: u8,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
    pub created_at: Timestamp,
    #[serde(default)]
    pub emi_payments: Vec<EmiPayment>,
}

impl Emi {
    pub fn amount_paid(&self) -> Money {
        self.emi_payments.iter().map(|p| p.amount).sum()
    }

    pub fn outstanding(&self) -> Money {
        (self.total_amount - self.amount_paid()).max(0.0)
    }
}

/// Per-category monthly budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub id: EntityId,
    pub category: String,
    pub amount: Money,
    pub year: i32,
    pub month: u32,
    pub user_id: UserId,
    pub workspace_id: WorkspaceId,
}

/// Server-computed spending prediction for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedBudget {
    pub category: String,
    pub predicted_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetWorthPoint {
    pub snapshot_date: NaiveDate,
    pub net_worth: Money,
}

/// Member of an organization workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: UserId,
    pub display_name: String,
    pub role: MemberRole,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_from_backend_row() {
        let row = json!({
            "id": "0190a3f2-6c1e-7f00-8000-000000000001",
            "name": "Visa",
            "type": "Credit Card",
            "balance": 420.5,
            "icon_name": "CreditCard",
            "user_id": "0190a3f2-6c1e-7f00-8000-000000000002",
            "workspace_id": "0190a3f2-6c1e-7f00-8000-000000000003",
            "created_at": "2024-05-01T10:00:00Z"
        });
        let account: Account = serde_json::from_value(row).unwrap();
        assert_eq!(account.kind(), Some(AccountType::CreditCard));
        assert!(account.is_liability());
    }

    #[test]
    fn test_unknown_account_type_is_asset() {
        let row = json!({
            "id": "0190a3f2-6c1e-7f00-8000-000000000001",
            "name": "Car",
            "type": "Car Loan",
            "balance": 9000.0,
            "user_id": "0190a3f2-6c1e-7f00-8000-000000000002",
            "workspace_id": "0190a3f2-6c1e-7f00-8000-000000000003",
            "created_at": "2024-05-01T10:00:00Z"
        });
        let account: Account = serde_json::from_value(row).unwrap();
        assert_eq!(account.kind(), None);
        assert!(!account.is_liability());
        assert!(account.icon_name.is_empty());
    }

    #[test]
    fn test_expense_embeds_items() {
        let row = json!({
            "id": "0190a3f2-6c1e-7f00-8000-000000000010",
            "title": "Weekly shop",
            "amount": 30.0,
            "category": "Groceries",
            "date": "2024-06-02",
            "user_id": "0190a3f2-6c1e-7f00-8000-000000000002",
            "workspace_id": "0190a3f2-6c1e-7f00-8000-000000000003",
            "created_at": "2024-06-02T09:00:00Z",
            "expense_items": [{
                "id": "0190a3f2-6c1e-7f00-8000-000000000011",
                "expense_id": "0190a3f2-6c1e-7f00-8000-000000000010",
                "name": "Milk",
                "price": 2.5,
                "quantity": 4,
                "user_id": "0190a3f2-6c1e-7f00-8000-000000000002",
                "created_at": "2024-06-02T09:00:00Z"
            }]
        });
        let expense: Expense = serde_json::from_value(row).unwrap();
        assert_eq!(expense.expense_items.len(), 1);
        assert_eq!(expense.expense_items[0].line_total(), 10.0);
        assert_eq!(expense.account_id, None);
    }

    #[test]
    fn test_workspace_wire_format() {
        let row = json!({
            "id": "0190a3f2-6c1e-7f00-8000-000000000003",
            "name": "Acme",
            "type": "organization",
            "owner_id": "0190a3f2-6c1e-7f00-8000-000000000002",
            "role": "admin",
            "is_initial": false
        });
        let ws: Workspace = serde_json::from_value(row).unwrap();
        assert!(ws.is_organization());
        assert_eq!(ws.role, MemberRole::Admin);
    }
}
