use super::{drop_expense, labelled, Feature};
use crate::optimistic::{confirmed_mutate, optimistic_mutate};
use crate::page::PageSync;
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    Account, AccountTotals, EntityId, Expense, FintraResult, Goal, NewAccount, NewExpense,
    NewTopUp, PredictedBudget, RecurringIncome, TopUp, Workspace,
};
use serde::{Deserialize, Serialize};

/// Overview page: balances, goals, recent spending and budget predictions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dashboard;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub accounts: Vec<Account>,
    pub goals: Vec<Goal>,
    pub expenses: Vec<Expense>,
    pub top_ups: Vec<TopUp>,
    pub recurring_incomes: Vec<RecurringIncome>,
    pub predicted_budgets: Vec<PredictedBudget>,
}

impl DashboardSnapshot {
    pub fn totals(&self) -> AccountTotals {
        AccountTotals::from_accounts(&self.accounts)
    }
}

#[async_trait]
impl Feature for Dashboard {
    type Snapshot = DashboardSnapshot;
    const KEY: &'static str = "fintra_dashboard_data";
    const NAME: &'static str = "Dashboard";

    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<DashboardSnapshot> {
        let id = workspace.id;
        let (accounts, goals, expenses, top_ups, recurring_incomes, predicted_budgets) = tokio::try_join!(
            labelled("Accounts", remote.get_accounts(id)),
            labelled("Goals", remote.get_goals(id)),
            labelled("Expenses", remote.get_expenses(id)),
            labelled("Top-ups", remote.get_top_ups(id)),
            labelled("Recurring incomes", remote.get_recurring_incomes(id)),
            labelled("Predicted budgets", remote.get_predicted_budgets(id)),
        )?;
        Ok(DashboardSnapshot {
            accounts,
            goals,
            expenses,
            top_ups,
            recurring_incomes,
            predicted_budgets,
        })
    }
}

impl PageSync<Dashboard> {
    pub async fn add_expense(&self, expense: NewExpense) -> FintraResult<()> {
        expense.validate()?;
        let workspace_id = self.workspace().id;
        confirmed_mutate(self, self.remote().add_expense(workspace_id, &expense)).await
    }

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

    pub async fn add_account(&self, account: NewAccount) -> FintraResult<()> {
        account.validate()?;
        let workspace_id = self.workspace().id;
        confirmed_mutate(self, self.remote().add_account(workspace_id, &account)).await
    }

    pub async fn delete_account(&self, account_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| s.accounts.retain(|a| a.id != account_id),
            self.remote().delete_account(account_id),
        )
        .await
    }

    pub async fn add_top_up(&self, top_up: NewTopUp) -> FintraResult<()> {
        top_up.validate()?;
        let workspace_id = self.workspace().id;
        confirmed_mutate(self, self.remote().add_top_up(workspace_id, &top_up)).await
    }
}
