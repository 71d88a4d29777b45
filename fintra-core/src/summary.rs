//! Derived figures computed from loaded snapshots.

use crate::entities::{Account, CategoryBudget, Expense, PredictedBudget, RecurringIncome};
use crate::identity::{EntityId, Money};
use std::collections::{BTreeMap, HashMap};

/// Assets, liabilities and net worth across a set of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AccountTotals {
    pub assets: Money,
    pub liabilities: Money,
}

impl AccountTotals {
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        accounts
            .into_iter()
            .fold(Self::default(), |mut totals, account| {
                if account.is_liability() {
                    totals.liabilities += account.balance;
                } else {
                    totals.assets += account.balance;
                }
                totals
            })
    }

    pub fn net_worth(&self) -> Money {
        self.assets - self.liabilities
    }
}

/// Sum of active recurring incomes keyed by account.
pub fn monthly_income_per_account(incomes: &[RecurringIncome]) -> HashMap<EntityId, Money> {
    let mut totals = HashMap::new();
    for income in incomes.iter().filter(|i| i.is_active) {
        *totals.entry(income.account_id).or_insert(0.0) += income.amount;
    }
    totals
}

/// Expense totals keyed by category, sorted by category name.
pub fn spending_per_category<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> BTreeMap<String, Money> {
    let mut totals = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
    }
    totals
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub category: String,
    pub budgeted: Money,
    pub spent: Money,
}

impl BudgetProgress {
    pub fn remaining(&self) -> Money {
        self.budgeted - self.spent
    }

    /// Spent over budgeted; `None` when nothing was budgeted.
    pub fn ratio(&self) -> Option<f64> {
        (self.budgeted > 0.0).then(|| self.spent / self.budgeted)
    }

    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budgeted
    }
}

/// Budgeted against spent for every category with a budget.
pub fn budget_progress(
    budgets: &[CategoryBudget],
    spending: &BTreeMap<String, Money>,
) -> Vec<BudgetProgress> {
    budgets
        .iter()
        .map(|budget| BudgetProgress {
            category: budget.category.clone(),
            budgeted: budget.amount,
            spent: spending.get(&budget.category).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Same as [`budget_progress`] but against server predictions.
pub fn predicted_progress(
    predictions: &[PredictedBudget],
    spending: &BTreeMap<String, Money>,
) -> Vec<BudgetProgress> {
    predictions
        .iter()
        .map(|p| BudgetProgress {
            category: p.category.clone(),
            budgeted: p.predicted_amount,
            spent: spending.get(&p.category).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Purchases of one item name across all expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedItem {
    pub name: String,
    pub total_quantity: u64,
    pub total_spent: Money,
    pub purchases: usize,
}

/// Group expense line items by case-insensitive name, highest spend first.
pub fn aggregate_items<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Vec<AggregatedItem> {
    let mut by_name: HashMap<String, AggregatedItem> = HashMap::new();
    for item in expenses.into_iter().flat_map(|e| e.expense_items.iter()) {
        let key = item.name.trim().to_lowercase();
        let entry = by_name.entry(key).or_insert_with(|| AggregatedItem {
            name: item.name.trim().to_string(),
            total_quantity: 0,
            total_spent: 0.0,
            purchases: 0,
        });
        entry.total_quantity += u64::from(item.quantity);
        entry.total_spent += item.line_total();
        entry.purchases += 1;
    }
    let mut items: Vec<_> = by_name.into_values().collect();
    items.sort_by(|a, b| {
        b.total_spent
            .total_cmp(&a.total_spent)
            .then_with(|| a.name.cmp(&b.name))
    });
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ExpenseItem;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn account(kind: &str, balance: Money) -> Account {
        Account {
            id: Uuid::now_v7(),
            name: kind.to_string(),
            account_type: kind.to_string(),
            balance,
            icon_name: String::new(),
            user_id: Uuid::nil(),
            workspace_id: Uuid::nil(),
            created_at: Utc::now(),
        }
    }

    fn expense(category: &str, amount: Money, items: &[(&str, Money, u32)]) -> Expense {
        let id = Uuid::now_v7();
        Expense {
            id,
            title: category.to_string(),
            amount,
            category: category.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: None,
            description: None,
            account_id: None,
            user_id: Uuid::nil(),
            workspace_id: Uuid::nil(),
            created_at: Utc::now(),
            verified: None,
            expense_items: items
                .iter()
                .map(|(name, price, quantity)| ExpenseItem {
                    id: Uuid::now_v7(),
                    expense_id: id,
                    name: name.to_string(),
                    price: *price,
                    quantity: *quantity,
                    user_id: Uuid::nil(),
                    created_at: Utc::now(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_account_totals() {
        let accounts = vec![
            account("Checking", 1000.0),
            account("Savings", 500.0),
            account("Credit Card", 300.0),
            account("Loan", 200.0),
        ];
        let totals = AccountTotals::from_accounts(&accounts);
        assert_eq!(totals.assets, 1500.0);
        assert_eq!(totals.liabilities, 500.0);
        assert_eq!(totals.net_worth(), 1000.0);
    }

    #[test]
    fn test_monthly_income_skips_inactive() {
        let account_id = Uuid::now_v7();
        let income = |amount, is_active| RecurringIncome {
            id: Uuid::now_v7(),
            account_id,
            amount,
            name: "Salary".to_string(),
            day_of_month: 1,
            is_active,
            user_id: Uuid::nil(),
            workspace_id: Uuid::nil(),
            created_at: Utc::now(),
        };
        let totals = monthly_income_per_account(&[income(3000.0, true), income(250.0, false)]);
        assert_eq!(totals.get(&account_id), Some(&3000.0));
    }

    #[test]
    fn test_budget_progress() {
        let expenses = vec![expense("Dining", 40.0, &[]), expense("Dining", 70.0, &[])];
        let spending = spending_per_category(&expenses);
        let budgets = vec![CategoryBudget {
            id: Uuid::now_v7(),
            category: "Dining".to_string(),
            amount: 100.0,
            year: 2024,
            month: 6,
            user_id: Uuid::nil(),
            workspace_id: Uuid::nil(),
        }];
        let progress = budget_progress(&budgets, &spending);
        assert_eq!(progress[0].spent, 110.0);
        assert!(progress[0].is_over_budget());
        assert_eq!(progress[0].remaining(), -10.0);
    }

    #[test]
    fn test_ratio_without_budget() {
        let progress = BudgetProgress {
            category: "Other".to_string(),
            budgeted: 0.0,
            spent: 5.0,
        };
        assert_eq!(progress.ratio(), None);
    }

    #[test]
    fn test_aggregate_items_case_insensitive() {
        let expenses = vec![
            expense("Groceries", 10.0, &[("Milk", 2.0, 2), ("Bread", 3.0, 1)]),
            expense("Groceries", 6.0, &[("milk ", 2.0, 3)]),
        ];
        let items = aggregate_items(&expenses);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Milk");
        assert_eq!(items[0].total_quantity, 5);
        assert_eq!(items[0].total_spent, 10.0);
        assert_eq!(items[0].purchases, 2);
        assert_eq!(items[1].name, "Bread");
    }
}
