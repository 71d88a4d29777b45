//! The remote data service contract.
//!
//! Every read and write the client performs goes through this trait. The
//! backend owns all business rules (balance adjustments, cascades, budget
//! predictions, membership checks); implementations only move data.

use async_trait::async_trait;
use chrono::NaiveDate;
use fintra_core::{
    Account, BudgetInput, BudgetPeriod, CategoryBudget, Emi, EntityId, Expense, Goal, Member,
    MemberRole, NetWorthPoint, NetWorthRange, NewAccount, NewEmi, NewExpense, NewGoal,
    NewRecurringIncome, NewTopUp, PaymentInput, PredictedBudget, RecurringIncome, RemoteError,
    TopUp, UserId, Workspace, WorkspaceId, WorkspaceType,
};

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Reads and writes against the managed backend.
///
/// Reads are scoped by workspace. Writes return once the backend has
/// committed; callers revalidate afterwards to pick up server-side effects.
#[async_trait]
pub trait RemoteDataService: Send + Sync {
    // ------------------------------------------------------------------
    // Workspaces
    // ------------------------------------------------------------------

    /// Workspaces visible to the signed-in user, with their role in each.
    async fn get_workspaces(&self) -> RemoteResult<Vec<Workspace>>;

    /// Returns the new workspace id.
    async fn create_workspace(
        &self,
        name: &str,
        workspace_type: WorkspaceType,
    ) -> RemoteResult<WorkspaceId>;

    async fn delete_workspace(&self, workspace_id: WorkspaceId) -> RemoteResult<()>;

    /// Members of an organization workspace.
    async fn get_workspace_members(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Member>>;

    async fn add_member(
        &self,
        workspace_id: WorkspaceId,
        email: &str,
        role: MemberRole,
    ) -> RemoteResult<()>;

    async fn update_member_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: MemberRole,
    ) -> RemoteResult<()>;

    async fn remove_member(&self, workspace_id: WorkspaceId, user_id: UserId) -> RemoteResult<()>;

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    async fn get_accounts(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Account>>;

    /// Goals with embedded payments, newest first.
    async fn get_goals(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Goal>>;

    /// Expenses with embedded items, ordered by date then creation time,
    /// both descending.
    async fn get_expenses(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Expense>>;

    /// Expenses dated in `[from, until)`, same ordering as [`get_expenses`].
    ///
    /// [`get_expenses`]: RemoteDataService::get_expenses
    async fn get_expenses_between(
        &self,
        workspace_id: WorkspaceId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> RemoteResult<Vec<Expense>> {
        let expenses = self.get_expenses(workspace_id).await?;
        Ok(expenses
            .into_iter()
            .filter(|e| e.date >= from && e.date < until)
            .collect())
    }

    async fn get_top_ups(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<TopUp>>;

    async fn get_recurring_incomes(
        &self,
        workspace_id: WorkspaceId,
    ) -> RemoteResult<Vec<RecurringIncome>>;

    /// EMIs with embedded payments, ordered by due day.
    async fn get_emis(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Emi>>;

    async fn get_category_budgets(
        &self,
        workspace_id: WorkspaceId,
        period: BudgetPeriod,
    ) -> RemoteResult<Vec<CategoryBudget>>;

    async fn get_predicted_budgets(
        &self,
        workspace_id: WorkspaceId,
    ) -> RemoteResult<Vec<PredictedBudget>>;

    async fn get_net_worth_history(
        &self,
        workspace_id: WorkspaceId,
        range: NetWorthRange,
    ) -> RemoteResult<Vec<NetWorthPoint>>;

    // ------------------------------------------------------------------
    // Expenses and income
    // ------------------------------------------------------------------

    async fn add_expense(&self, workspace_id: WorkspaceId, expense: &NewExpense)
        -> RemoteResult<()>;

    async fn update_expense(&self, expense_id: EntityId, expense: &NewExpense)
        -> RemoteResult<()>;

    async fn delete_expense(&self, expense_id: EntityId) -> RemoteResult<()>;

    async fn add_top_up(&self, workspace_id: WorkspaceId, top_up: &NewTopUp) -> RemoteResult<()>;

    async fn update_top_up(&self, top_up_id: EntityId, top_up: &NewTopUp) -> RemoteResult<()>;

    async fn delete_top_up(&self, top_up_id: EntityId) -> RemoteResult<()>;

    async fn add_recurring_income(
        &self,
        workspace_id: WorkspaceId,
        income: &NewRecurringIncome,
    ) -> RemoteResult<()>;

    async fn update_recurring_income(
        &self,
        income_id: EntityId,
        income: &NewRecurringIncome,
    ) -> RemoteResult<()>;

    async fn delete_recurring_income(&self, income_id: EntityId) -> RemoteResult<()>;

    // ------------------------------------------------------------------
    // Accounts
    // ------------------------------------------------------------------

    async fn add_account(&self, workspace_id: WorkspaceId, account: &NewAccount)
        -> RemoteResult<()>;

    async fn delete_account(&self, account_id: EntityId) -> RemoteResult<()>;

    /// Replace the set of workspaces an account is shared with.
    async fn share_account_with_workspaces(
        &self,
        account_id: EntityId,
        workspace_ids: &[WorkspaceId],
    ) -> RemoteResult<()>;

    // ------------------------------------------------------------------
    // Goals
    // ------------------------------------------------------------------

    async fn add_goal(&self, workspace_id: WorkspaceId, goal: &NewGoal) -> RemoteResult<()>;

    async fn update_goal(&self, goal_id: EntityId, goal: &NewGoal) -> RemoteResult<()>;

    async fn delete_goal(&self, goal_id: EntityId) -> RemoteResult<()>;

    /// `goal_title` labels the expense the backend books for the payment.
    async fn add_goal_payment(
        &self,
        goal_id: EntityId,
        goal_title: &str,
        payment: &PaymentInput,
    ) -> RemoteResult<()>;

    async fn update_goal_payment(
        &self,
        payment_id: EntityId,
        payment: &PaymentInput,
    ) -> RemoteResult<()>;

    async fn delete_goal_payment(&self, payment_id: EntityId) -> RemoteResult<()>;

    // ------------------------------------------------------------------
    // EMIs
    // ------------------------------------------------------------------

    async fn add_emi(&self, workspace_id: WorkspaceId, emi: &NewEmi) -> RemoteResult<()>;

    async fn delete_emi(&self, emi_id: EntityId) -> RemoteResult<()>;

    /// `emi_name` labels the expense the backend books for the payment.
    async fn add_emi_payment(
        &self,
        emi_id: EntityId,
        emi_name: &str,
        payment: &PaymentInput,
    ) -> RemoteResult<()>;

    async fn update_emi_payment(
        &self,
        payment_id: EntityId,
        payment: &PaymentInput,
    ) -> RemoteResult<()>;

    async fn delete_emi_payment(&self, payment_id: EntityId) -> RemoteResult<()>;

    // ------------------------------------------------------------------
    // Budgets
    // ------------------------------------------------------------------

    async fn upsert_budgets(
        &self,
        workspace_id: WorkspaceId,
        period: BudgetPeriod,
        budgets: &[BudgetInput],
    ) -> RemoteResult<()>;
}
