//! Write payloads sent to the remote data service.
//!
//! Each payload validates locally before a mutation is attempted. The
//! backend remains authoritative: these checks only reject input the
//! server would refuse anyway.

use crate::enums::{GoalStatus, NetWorthInterval, PaymentType};
use crate::error::ValidationError;
use crate::identity::{EntityId, Money, Timestamp};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredFieldMissing {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_positive(field: &str, value: Money) -> Result<(), ValidationError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must be > 0".to_string(),
        });
    }
    Ok(())
}

fn require_day_of_month(field: &str, day: u8) -> Result<(), ValidationError> {
    if !(1..=31).contains(&day) {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: "must be between 1 and 31".to_string(),
        });
    }
    Ok(())
}

/// Line item of an expense being created or updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItemInput {
    pub name: String,
    pub price: Money,
    pub quantity: u32,
}

/// Expense fields for both `add_expense` and `update_expense`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub account_id: Option<EntityId>,
    pub title: String,
    pub amount: Money,
    pub category: String,
    pub date: NaiveDate,
    pub time: Option<String>,
    pub description: Option<String>,
    pub items: Vec<ExpenseItemInput>,
}

impl NewExpense {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("category", &self.category)?;
        require_positive("amount", self.amount)?;
        for item in &self.items {
            require_text("items.name", &item.name)?;
            if item.quantity == 0 {
                return Err(ValidationError::InvalidValue {
                    field: "items.quantity".to_string(),
                    reason: "must be >= 1".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub balance: Money,
    pub icon_name: String,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("type", &self.account_type)?;
        if !self.balance.is_finite() {
            return Err(ValidationError::InvalidValue {
                field: "balance".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTopUp {
    pub account_id: EntityId,
    pub amount: Money,
    pub name: String,
    pub description: Option<String>,
    pub topup_time: Timestamp,
}

impl NewTopUp {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_positive("amount", self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecurringIncome {
    pub account_id: EntityId,
    pub amount: Money,
    pub name: String,
    pub day_of_month: u8,
    pub is_active: bool,
}

impl NewRecurringIncome {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_positive("amount", self.amount)?;
        require_day_of_month("day_of_month", self.day_of_month)
    }
}

/// Goal fields for both creation and `update_goal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGoal {
    pub title: String,
    pub description: String,
    pub icon_name: String,
    pub target_amount: Money,
    pub current_amount: Money,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
}

impl NewGoal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_positive("target_amount", self.target_amount)?;
        if !self.current_amount.is_finite() || self.current_amount < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "current_amount".to_string(),
                reason: "must be >= 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Payment toward a goal or an EMI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInput {
    pub account_id: EntityId,
    pub amount: Money,
    pub payment_type: PaymentType,
    pub payment_date: NaiveDate,
}

impl PaymentInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_positive("amount", self.amount)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEmi {
    pub name: String,
    pub total_amount: Money,
    pub monthly_payment: Money,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub due_date_of_month: u8,
}

impl NewEmi {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_positive("total_amount", self.total_amount)?;
        require_positive("monthly_payment", self.monthly_payment)?;
        require_day_of_month("due_date_of_month", self.due_date_of_month)?;
        if self.end_date < self.start_date {
            return Err(ValidationError::InvalidValue {
                field: "end_date".to_string(),
                reason: "must not be before start_date".to_string(),
            });
        }
        Ok(())
    }
}

/// One category budget for the month being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetInput {
    pub category: String,
    pub amount: Money,
}

impl BudgetInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("category", &self.category)?;
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "amount".to_string(),
                reason: "must be >= 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Calendar month, used to scope budget reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetPeriod {
    pub year: i32,
    pub month: u32,
}

impl BudgetPeriod {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Exclusive upper bound of the period.
    pub fn next_first_day(&self) -> Option<NaiveDate> {
        self.first_day()?.checked_add_months(Months::new(1))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Parameters of `get_net_worth_history`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetWorthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval: NetWorthInterval,
}

impl NetWorthRange {
    /// The trailing year ending at `today`, bucketed monthly.
    pub fn trailing_year(today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(Months::new(12))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start,
            end: today,
            interval: NetWorthInterval::Month,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::InvalidValue {
                field: "end".to_string(),
                reason: "must not be before start".to_string(),
            });
        }
        Ok(())
    }
}
