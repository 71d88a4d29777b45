use super::{labelled, Feature};
use crate::optimistic::{confirmed_mutate, optimistic_mutate};
use crate::page::PageSync;
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    monthly_income_per_account, Account, AccountTotals, EntityId, FintraResult, Money,
    NewAccount, NewRecurringIncome, RecurringIncome, Workspace,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default)]
pub struct Accounts;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountsSnapshot {
    pub accounts: Vec<Account>,
    pub recurring_incomes: Vec<RecurringIncome>,
}

impl AccountsSnapshot {
    pub fn totals(&self) -> AccountTotals {
        AccountTotals::from_accounts(&self.accounts)
    }

    pub fn monthly_income(&self) -> HashMap<EntityId, Money> {
        monthly_income_per_account(&self.recurring_incomes)
    }
}

#[async_trait]
impl Feature for Accounts {
    type Snapshot = AccountsSnapshot;
    const KEY: &'static str = "fintra_accounts_data";
    const NAME: &'static str = "Accounts";

    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<AccountsSnapshot> {
        let (accounts, recurring_incomes) = tokio::try_join!(
            labelled("Accounts", remote.get_accounts(workspace.id)),
            labelled("Recurring incomes", remote.get_recurring_incomes(workspace.id)),
        )?;
        Ok(AccountsSnapshot {
            accounts,
            recurring_incomes,
        })
    }
}

impl PageSync<Accounts> {
    pub async fn add_account(&self, account: NewAccount) -> FintraResult<()> {
        account.validate()?;
        let workspace_id = self.workspace().id;
        confirmed_mutate(self, self.remote().add_account(workspace_id, &account)).await
    }

    /// Removes the account and its recurring incomes locally; the backend
    /// cascades the rest.
    pub async fn delete_account(&self, account_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| {
                s.accounts.retain(|a| a.id != account_id);
                s.recurring_incomes.retain(|i| i.account_id != account_id);
            },
            self.remote().delete_account(account_id),
        )
        .await
    }

    pub async fn add_recurring_income(&self, income: NewRecurringIncome) -> FintraResult<()> {
        income.validate()?;
        let workspace_id = self.workspace().id;
        confirmed_mutate(
            self,
            self.remote().add_recurring_income(workspace_id, &income),
        )
        .await
    }

    pub async fn update_recurring_income(
        &self,
        income_id: EntityId,
        income: NewRecurringIncome,
    ) -> FintraResult<()> {
        income.validate()?;
        confirmed_mutate(
            self,
            self.remote().update_recurring_income(income_id, &income),
        )
        .await
    }

    pub async fn delete_recurring_income(&self, income_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| s.recurring_incomes.retain(|i| i.id != income_id),
            self.remote().delete_recurring_income(income_id),
        )
        .await
    }
}
