use super::{drop_expense, drop_top_up, labelled, Feature};
use crate::optimistic::{confirmed_mutate, optimistic_mutate};
use crate::page::PageSync;
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    Account, EntityId, Expense, FintraResult, NewExpense, NewTopUp, RecurringIncome, TopUp,
    Workspace,
};
use serde::{Deserialize, Serialize};

/// Full history of expenses and income.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transactions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionsSnapshot {
    pub expenses: Vec<Expense>,
    pub top_ups: Vec<TopUp>,
    pub recurring_incomes: Vec<RecurringIncome>,
    pub accounts: Vec<Account>,
}

#[async_trait]
impl Feature for Transactions {
    type Snapshot = TransactionsSnapshot;
    const KEY: &'static str = "fintra_transactions_data";
    const NAME: &'static str = "Transactions";

    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<TransactionsSnapshot> {
        let id = workspace.id;
        let (expenses, top_ups, recurring_incomes, accounts) = tokio::try_join!(
            labelled("Expenses", remote.get_expenses(id)),
            labelled("Top-ups", remote.get_top_ups(id)),
            labelled("Recurring incomes", remote.get_recurring_incomes(id)),
            labelled("Accounts", remote.get_accounts(id)),
        )?;
        Ok(TransactionsSnapshot {
            expenses,
            top_ups,
            recurring_incomes,
            accounts,
        })
    }
}

impl PageSync<Transactions> {
    pub async fn update_expense(&self, expense_id: EntityId, expense: NewExpense) -> FintraResult<()> {
        expense.validate()?;
        confirmed_mutate(self, self.remote().update_expense(expense_id, &expense)).await
    }

    pub async fn delete_expense(&self, expense_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| drop_expense(&mut s.expenses, &mut s.accounts, expense_id),
            self.remote().delete_expense(expense_id),
        )
        .await
    }

    pub async fn update_top_up(&self, top_up_id: EntityId, top_up: NewTopUp) -> FintraResult<()> {
        top_up.validate()?;
        confirmed_mutate(self, self.remote().update_top_up(top_up_id, &top_up)).await
    }

    pub async fn delete_top_up(&self, top_up_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| drop_top_up(&mut s.top_ups, &mut s.accounts, top_up_id),
            self.remote().delete_top_up(top_up_id),
        )
        .await
    }
}
