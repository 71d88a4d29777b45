//! Fintra Core - Domain Types
//!
//! Records, write payloads, errors and pure summary functions shared by
//! every other crate. No I/O lives here.

pub mod entities;
pub mod enums;
pub mod error;
pub mod identity;
pub mod receipt;
pub mod requests;
pub mod summary;

pub use entities::{
    Account, CategoryBudget, Emi, EmiPayment, Expense, ExpenseItem, Goal, GoalPayment, Member,
    NetWorthPoint, PredictedBudget, RecurringIncome, TopUp, Workspace,
};
pub use enums::{
    AccountType, EnumParseError, GoalStatus, MemberRole, NetWorthInterval, PaymentType,
    WorkspaceType, EXPENSE_CATEGORIES,
};
pub use error::{
    ConfigError, FintraError, FintraResult, RemoteError, SyncError, ValidationError,
};
pub use identity::{new_entity_id, EntityId, Money, Timestamp, UserId, WorkspaceId};
pub use receipt::{ExpenseDraft, ReceiptDetails, ReceiptItem};
pub use requests::{
    BudgetInput, BudgetPeriod, ExpenseItemInput, NetWorthRange, NewAccount, NewEmi, NewExpense,
    NewGoal, NewRecurringIncome, NewTopUp, PaymentInput,
};
pub use summary::{
    aggregate_items, budget_progress, monthly_income_per_account, predicted_progress,
    spending_per_category, AccountTotals, AggregatedItem, BudgetProgress,
};
