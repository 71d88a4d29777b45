//! Fintra Test Utilities
//!
//! Shared test infrastructure for the Fintra workspace:
//! - A scriptable in-memory remote with failure injection, latency gates
//!   and call counters
//! - A canned receipt extractor
//! - Proptest generators for records and workspaces
//! - Fixtures and assertions

pub use fintra_client::{ReceiptExtractor, RemoteDataService, RemoteResult};
pub use fintra_core::{
    Account, BudgetInput, BudgetPeriod, CategoryBudget, Emi, EntityId, Expense, ExpenseItem,
    FintraError, FintraResult, Goal, GoalStatus, Member, MemberRole, NetWorthPoint,
    NetWorthRange, NewAccount, NewEmi, NewExpense, NewGoal, NewRecurringIncome, NewTopUp,
    PaymentInput, PredictedBudget, ReceiptDetails, RecurringIncome, RemoteError, SyncError,
    TopUp, UserId, Workspace, WorkspaceId, WorkspaceType,
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

// ============================================================================
// MOCK REMOTE
// ============================================================================

/// Backing records of [`MockRemote`], keyed by workspace.
#[derive(Debug, Default, Clone)]
pub struct MockData {
    pub workspaces: Vec<Workspace>,
    pub accounts: HashMap<WorkspaceId, Vec<Account>>,
    pub goals: HashMap<WorkspaceId, Vec<Goal>>,
    pub expenses: HashMap<WorkspaceId, Vec<Expense>>,
    pub top_ups: HashMap<WorkspaceId, Vec<TopUp>>,
    pub recurring_incomes: HashMap<WorkspaceId, Vec<RecurringIncome>>,
    pub emis: HashMap<WorkspaceId, Vec<Emi>>,
    pub category_budgets: HashMap<WorkspaceId, Vec<CategoryBudget>>,
    pub predicted_budgets: HashMap<WorkspaceId, Vec<PredictedBudget>>,
    pub net_worth_history: HashMap<WorkspaceId, Vec<NetWorthPoint>>,
    pub members: HashMap<WorkspaceId, Vec<Member>>,
}

fn scoped<T: Clone>(map: &HashMap<WorkspaceId, Vec<T>>, workspace_id: WorkspaceId) -> Vec<T> {
    map.get(&workspace_id).cloned().unwrap_or_default()
}

/// In-memory [`RemoteDataService`].
///
/// Reads copy their result when called, then wait on any gate queued for
/// that operation, then fail if a failure is injected. That ordering lets
/// tests hold a response while newer data lands behind it.
#[derive(Debug, Default)]
pub struct MockRemote {
    user_id: UserId,
    data: Mutex<MockData>,
    failures: Mutex<HashMap<String, RemoteError>>,
    gates: Mutex<HashMap<String, VecDeque<Arc<Notify>>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Edit backing records directly.
    pub fn update(&self, f: impl FnOnce(&mut MockData)) {
        f(&mut lock(&self.data));
    }

    pub fn data(&self) -> MockData {
        lock(&self.data).clone()
    }

    /// Make every call to `operation` fail with `error` until cleared.
    pub fn fail_with(&self, operation: &str, error: RemoteError) {
        lock(&self.failures).insert(operation.to_string(), error);
    }

    pub fn clear_failure(&self, operation: &str) {
        lock(&self.failures).remove(operation);
    }

    /// Hold the next call to `operation` until the returned gate is notified.
    pub fn gate_next(&self, operation: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        lock(&self.gates)
            .entry(operation.to_string())
            .or_default()
            .push_back(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self, operation: &str) -> usize {
        lock(&self.calls).get(operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Wait until `operation` has been called at least `count` times.
    pub async fn wait_for_calls(&self, operation: &str, count: usize) {
        while self.calls(operation) < count {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    }

    async fn enter(&self, operation: &str) -> RemoteResult<()> {
        *lock(&self.calls).entry(operation.to_string()).or_insert(0) += 1;
        let gate = lock(&self.gates)
            .get_mut(operation)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match lock(&self.failures).get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    async fn read<T>(&self, operation: &str, f: impl FnOnce(&MockData) -> T) -> RemoteResult<T> {
        let value = f(&lock(&self.data));
        self.enter(operation).await?;
        Ok(value)
    }

    async fn write(&self, operation: &str, f: impl FnOnce(&mut MockData)) -> RemoteResult<()> {
        self.enter(operation).await?;
        f(&mut lock(&self.data));
        Ok(())
    }

    fn expense_from(&self, workspace_id: WorkspaceId, id: EntityId, input: &NewExpense) -> Expense {
        let now = Utc::now();
        Expense {
            id,
            title: input.title.clone(),
            amount: input.amount,
            category: input.category.clone(),
            date: input.date,
            time: input.time.clone(),
            description: input.description.clone(),
            account_id: input.account_id,
            user_id: self.user_id,
            workspace_id,
            created_at: now,
            verified: None,
            expense_items: input
                .items
                .iter()
                .map(|item| ExpenseItem {
                    id: Uuid::now_v7(),
                    expense_id: id,
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                    user_id: self.user_id,
                    created_at: now,
                })
                .collect(),
        }
    }
}

fn adjust_balance(data: &mut MockData, account_id: EntityId, delta: f64) {
    for account in data.accounts.values_mut().flatten() {
        if account.id == account_id {
            account.balance += delta;
        }
    }
}

#[async_trait]
impl RemoteDataService for MockRemote {
    async fn get_workspaces(&self) -> RemoteResult<Vec<Workspace>> {
        self.read("get_workspaces", |d| d.workspaces.clone()).await
    }

    async fn create_workspace(
        &self,
        name: &str,
        workspace_type: WorkspaceType,
    ) -> RemoteResult<WorkspaceId> {
        let id = Uuid::now_v7();
        let owner_id = self.user_id;
        self.write("create_workspace", |d| {
            d.workspaces.push(Workspace {
                id,
                name: name.to_string(),
                workspace_type,
                owner_id,
                role: MemberRole::Admin,
                is_initial: false,
            })
        })
        .await?;
        Ok(id)
    }

    async fn delete_workspace(&self, workspace_id: WorkspaceId) -> RemoteResult<()> {
        self.write("delete_workspace", |d| {
            d.workspaces.retain(|w| w.id != workspace_id)
        })
        .await
    }

    async fn get_workspace_members(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Member>> {
        self.read("get_workspace_members", |d| scoped(&d.members, workspace_id))
            .await
    }

    async fn add_member(
        &self,
        workspace_id: WorkspaceId,
        email: &str,
        role: MemberRole,
    ) -> RemoteResult<()> {
        let display_name = email.split('@').next().unwrap_or(email).to_string();
        self.write("add_member", |d| {
            d.members.entry(workspace_id).or_default().push(Member {
                id: Uuid::now_v7(),
                display_name,
                role,
            })
        })
        .await
    }

    async fn update_member_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: MemberRole,
    ) -> RemoteResult<()> {
        self.write("update_member_role", |d| {
            if let Some(member) = d
                .members
                .get_mut(&workspace_id)
                .and_then(|m| m.iter_mut().find(|m| m.id == user_id))
            {
                member.role = role;
            }
        })
        .await
    }

    async fn remove_member(&self, workspace_id: WorkspaceId, user_id: UserId) -> RemoteResult<()> {
        self.write("remove_member", |d| {
            if let Some(members) = d.members.get_mut(&workspace_id) {
                members.retain(|m| m.id != user_id);
            }
        })
        .await
    }

    async fn get_accounts(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Account>> {
        self.read("get_accounts", |d| scoped(&d.accounts, workspace_id))
            .await
    }

    async fn get_goals(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Goal>> {
        self.read("get_goals", |d| scoped(&d.goals, workspace_id)).await
    }

    async fn get_expenses(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Expense>> {
        self.read("get_expenses", |d| {
            let mut expenses = scoped(&d.expenses, workspace_id);
            expenses.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
            expenses
        })
        .await
    }

    async fn get_top_ups(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<TopUp>> {
        self.read("get_top_ups", |d| scoped(&d.top_ups, workspace_id))
            .await
    }

    async fn get_recurring_incomes(
        &self,
        workspace_id: WorkspaceId,
    ) -> RemoteResult<Vec<RecurringIncome>> {
        self.read("get_recurring_incomes", |d| {
            scoped(&d.recurring_incomes, workspace_id)
        })
        .await
    }

    async fn get_emis(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Emi>> {
        self.read("get_emis", |d| scoped(&d.emis, workspace_id)).await
    }

    async fn get_category_budgets(
        &self,
        workspace_id: WorkspaceId,
        period: BudgetPeriod,
    ) -> RemoteResult<Vec<CategoryBudget>> {
        self.read("get_category_budgets", |d| {
            scoped(&d.category_budgets, workspace_id)
                .into_iter()
                .filter(|b| b.year == period.year && b.month == period.month)
                .collect()
        })
        .await
    }

    async fn get_predicted_budgets(
        &self,
        workspace_id: WorkspaceId,
    ) -> RemoteResult<Vec<PredictedBudget>> {
        self.read("get_predicted_budgets", |d| {
            scoped(&d.predicted_budgets, workspace_id)
        })
        .await
    }

    async fn get_net_worth_history(
        &self,
        workspace_id: WorkspaceId,
        range: NetWorthRange,
    ) -> RemoteResult<Vec<NetWorthPoint>> {
        self.read("get_net_worth_history", |d| {
            scoped(&d.net_worth_history, workspace_id)
                .into_iter()
                .filter(|p| p.snapshot_date >= range.start && p.snapshot_date <= range.end)
                .collect()
        })
        .await
    }

    async fn add_expense(&self, workspace_id: WorkspaceId, expense: &NewExpense) -> RemoteResult<()> {
        let record = self.expense_from(workspace_id, Uuid::now_v7(), expense);
        self.write("add_expense", |d| {
            if let Some(account_id) = record.account_id {
                adjust_balance(d, account_id, -record.amount);
            }
            d.expenses.entry(workspace_id).or_default().push(record);
        })
        .await
    }

    async fn update_expense(&self, expense_id: EntityId, expense: &NewExpense) -> RemoteResult<()> {
        self.write("update_expense", |d| {
            let found = d
                .expenses
                .iter()
                .find_map(|(ws, list)| list.iter().position(|e| e.id == expense_id).map(|i| (*ws, i)));
            if let Some((workspace_id, index)) = found {
                let updated = self.expense_from(workspace_id, expense_id, expense);
                if let Some(list) = d.expenses.get_mut(&workspace_id) {
                    list[index] = updated;
                }
            }
        })
        .await
    }

    async fn delete_expense(&self, expense_id: EntityId) -> RemoteResult<()> {
        self.write("delete_expense", |d| {
            let mut refund = None;
            for list in d.expenses.values_mut() {
                if let Some(pos) = list.iter().position(|e| e.id == expense_id) {
                    let removed = list.remove(pos);
                    refund = removed.account_id.map(|a| (a, removed.amount));
                }
            }
            if let Some((account_id, amount)) = refund {
                adjust_balance(d, account_id, amount);
            }
        })
        .await
    }

    async fn add_top_up(&self, workspace_id: WorkspaceId, top_up: &NewTopUp) -> RemoteResult<()> {
        let record = TopUp {
            id: Uuid::now_v7(),
            account_id: top_up.account_id,
            amount: top_up.amount,
            name: top_up.name.clone(),
            description: top_up.description.clone(),
            topup_time: top_up.topup_time,
            user_id: self.user_id,
            workspace_id,
            created_at: Utc::now(),
        };
        self.write("add_top_up", |d| {
            adjust_balance(d, record.account_id, record.amount);
            d.top_ups.entry(workspace_id).or_default().push(record);
        })
        .await
    }

    async fn update_top_up(&self, top_up_id: EntityId, top_up: &NewTopUp) -> RemoteResult<()> {
        self.write("update_top_up", |d| {
            if let Some(existing) = d
                .top_ups
                .values_mut()
                .flatten()
                .find(|t| t.id == top_up_id)
            {
                existing.account_id = top_up.account_id;
                existing.amount = top_up.amount;
                existing.name = top_up.name.clone();
                existing.description = top_up.description.clone();
                existing.topup_time = top_up.topup_time;
            }
        })
        .await
    }

    async fn delete_top_up(&self, top_up_id: EntityId) -> RemoteResult<()> {
        self.write("delete_top_up", |d| {
            for list in d.top_ups.values_mut() {
                list.retain(|t| t.id != top_up_id);
            }
        })
        .await
    }

    async fn add_recurring_income(
        &self,
        workspace_id: WorkspaceId,
        income: &NewRecurringIncome,
    ) -> RemoteResult<()> {
        let record = RecurringIncome {
            id: Uuid::now_v7(),
            account_id: income.account_id,
            amount: income.amount,
            name: income.name.clone(),
            day_of_month: income.day_of_month,
            is_active: income.is_active,
            user_id: self.user_id,
            workspace_id,
            created_at: Utc::now(),
        };
        self.write("add_recurring_income", |d| {
            d.recurring_incomes
                .entry(workspace_id)
                .or_default()
                .push(record)
        })
        .await
    }

    async fn update_recurring_income(
        &self,
        income_id: EntityId,
        income: &NewRecurringIncome,
    ) -> RemoteResult<()> {
        self.write("update_recurring_income", |d| {
            if let Some(existing) = d
                .recurring_incomes
                .values_mut()
                .flatten()
                .find(|i| i.id == income_id)
            {
                existing.account_id = income.account_id;
                existing.amount = income.amount;
                existing.name = income.name.clone();
                existing.day_of_month = income.day_of_month;
                existing.is_active = income.is_active;
            }
        })
        .await
    }

    async fn delete_recurring_income(&self, income_id: EntityId) -> RemoteResult<()> {
        self.write("delete_recurring_income", |d| {
            for list in d.recurring_incomes.values_mut() {
                list.retain(|i| i.id != income_id);
            }
        })
        .await
    }

    async fn add_account(&self, workspace_id: WorkspaceId, account: &NewAccount) -> RemoteResult<()> {
        let record = Account {
            id: Uuid::now_v7(),
            name: account.name.clone(),
            account_type: account.account_type.clone(),
            balance: account.balance,
            icon_name: account.icon_name.clone(),
            user_id: self.user_id,
            workspace_id,
            created_at: Utc::now(),
        };
        self.write("add_account", |d| {
            d.accounts.entry(workspace_id).or_default().push(record)
        })
        .await
    }

    async fn delete_account(&self, account_id: EntityId) -> RemoteResult<()> {
        self.write("delete_account", |d| {
            for list in d.accounts.values_mut() {
                list.retain(|a| a.id != account_id);
            }
            for list in d.recurring_incomes.values_mut() {
                list.retain(|i| i.account_id != account_id);
            }
        })
        .await
    }

    async fn share_account_with_workspaces(
        &self,
        account_id: EntityId,
        workspace_ids: &[WorkspaceId],
    ) -> RemoteResult<()> {
        self.write("share_account_with_workspaces", |d| {
            let Some(account) = d
                .accounts
                .values()
                .flatten()
                .find(|a| a.id == account_id)
                .cloned()
            else {
                return;
            };
            for workspace_id in workspace_ids {
                let list = d.accounts.entry(*workspace_id).or_default();
                if !list.iter().any(|a| a.id == account_id) {
                    list.push(account.clone());
                }
            }
        })
        .await
    }

    async fn add_goal(&self, workspace_id: WorkspaceId, goal: &NewGoal) -> RemoteResult<()> {
        let record = Goal {
            id: Uuid::now_v7(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            icon_name: goal.icon_name.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            target_date: goal.target_date,
            status: goal.status,
            user_id: self.user_id,
            workspace_id,
            created_at: Utc::now(),
            goal_payments: Vec::new(),
        };
        self.write("add_goal", |d| d.goals.entry(workspace_id).or_default().push(record))
            .await
    }

    async fn update_goal(&self, goal_id: EntityId, goal: &NewGoal) -> RemoteResult<()> {
        self.write("update_goal", |d| {
            if let Some(existing) = d.goals.values_mut().flatten().find(|g| g.id == goal_id) {
                existing.title = goal.title.clone();
                existing.description = goal.description.clone();
                existing.icon_name = goal.icon_name.clone();
                existing.target_amount = goal.target_amount;
                existing.current_amount = goal.current_amount;
                existing.target_date = goal.target_date;
                existing.status = goal.status;
            }
        })
        .await
    }

    async fn delete_goal(&self, goal_id: EntityId) -> RemoteResult<()> {
        self.write("delete_goal", |d| {
            for list in d.goals.values_mut() {
                list.retain(|g| g.id != goal_id);
            }
        })
        .await
    }

    async fn add_goal_payment(
        &self,
        _goal_id: EntityId,
        _goal_title: &str,
        _payment: &PaymentInput,
    ) -> RemoteResult<()> {
        self.enter("add_goal_payment").await
    }

    async fn update_goal_payment(
        &self,
        _payment_id: EntityId,
        _payment: &PaymentInput,
    ) -> RemoteResult<()> {
        self.enter("update_goal_payment").await
    }

    async fn delete_goal_payment(&self, payment_id: EntityId) -> RemoteResult<()> {
        self.write("delete_goal_payment", |d| {
            for goal in d.goals.values_mut().flatten() {
                goal.goal_payments.retain(|p| p.id != payment_id);
            }
        })
        .await
    }

    async fn add_emi(&self, workspace_id: WorkspaceId, emi: &NewEmi) -> RemoteResult<()> {
        let record = Emi {
            id: Uuid::now_v7(),
            name: emi.name.clone(),
            total_amount: emi.total_amount,
            monthly_payment: emi.monthly_payment,
            start_date: emi.start_date,
            end_date: emi.end_date,
            due_date_of_month: emi.due_date_of_month,
            user_id: self.user_id,
            workspace_id,
            created_at: Utc::now(),
            emi_payments: Vec::new(),
        };
        self.write("add_emi", |d| d.emis.entry(workspace_id).or_default().push(record))
            .await
    }

    async fn delete_emi(&self, emi_id: EntityId) -> RemoteResult<()> {
        self.write("delete_emi", |d| {
            for list in d.emis.values_mut() {
                list.retain(|e| e.id != emi_id);
            }
        })
        .await
    }

    async fn add_emi_payment(
        &self,
        _emi_id: EntityId,
        _emi_name: &str,
        _payment: &PaymentInput,
    ) -> RemoteResult<()> {
        self.enter("add_emi_payment").await
    }

    async fn update_emi_payment(
        &self,
        _payment_id: EntityId,
        _payment: &PaymentInput,
    ) -> RemoteResult<()> {
        self.enter("update_emi_payment").await
    }

    async fn delete_emi_payment(&self, payment_id: EntityId) -> RemoteResult<()> {
        self.write("delete_emi_payment", |d| {
            for emi in d.emis.values_mut().flatten() {
                emi.emi_payments.retain(|p| p.id != payment_id);
            }
        })
        .await
    }

    async fn upsert_budgets(
        &self,
        workspace_id: WorkspaceId,
        period: BudgetPeriod,
        budgets: &[BudgetInput],
    ) -> RemoteResult<()> {
        let user_id = self.user_id;
        self.write("upsert_budgets", |d| {
            let list = d.category_budgets.entry(workspace_id).or_default();
            for input in budgets {
                match list.iter_mut().find(|b| {
                    b.category == input.category && b.year == period.year && b.month == period.month
                }) {
                    Some(existing) => existing.amount = input.amount,
                    None => list.push(CategoryBudget {
                        id: Uuid::now_v7(),
                        category: input.category.clone(),
                        amount: input.amount,
                        year: period.year,
                        month: period.month,
                        user_id,
                        workspace_id,
                    }),
                }
            }
        })
        .await
    }
}

// ============================================================================
// MOCK RECEIPT EXTRACTOR
// ============================================================================

/// Extractor that always answers with the same model output.
#[derive(Debug, Clone)]
pub struct StaticReceiptExtractor {
    raw: String,
}

impl StaticReceiptExtractor {
    /// `raw` is model text as it would arrive, fences and all.
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }
}

#[async_trait]
impl ReceiptExtractor for StaticReceiptExtractor {
    async fn extract(&self, _image_base64: &str) -> RemoteResult<ReceiptDetails> {
        ReceiptDetails::parse(&self.raw).map_err(|e| RemoteError::InvalidResponse {
            operation: "extract_receipt".to_string(),
            reason: e.to_string(),
        })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for Fintra records.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_uuid() -> impl Strategy<Value = Uuid> {
        any::<[u8; 16]>().prop_map(Uuid::from_bytes)
    }

    pub fn arb_money() -> impl Strategy<Value = f64> {
        (0u32..1_000_000).prop_map(|cents| f64::from(cents) / 100.0)
    }

    pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (2020i32..2030, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN))
    }

    pub fn arb_workspace_type() -> impl Strategy<Value = WorkspaceType> {
        prop_oneof![Just(WorkspaceType::Personal), Just(WorkspaceType::Organization)]
    }

    pub fn arb_workspace() -> impl Strategy<Value = Workspace> {
        (arb_uuid(), "[A-Za-z ]{1,20}", arb_workspace_type(), any::<bool>()).prop_map(
            |(id, name, workspace_type, is_initial)| Workspace {
                id,
                name,
                workspace_type,
                owner_id: Uuid::nil(),
                role: MemberRole::Admin,
                is_initial,
            },
        )
    }

    pub fn arb_account(workspace_id: WorkspaceId) -> impl Strategy<Value = Account> {
        (
            arb_uuid(),
            "[A-Za-z ]{1,20}",
            prop::sample::select(vec!["Checking", "Savings", "Credit Card", "Investment", "Loan"]),
            arb_money(),
        )
            .prop_map(move |(id, name, account_type, balance)| Account {
                id,
                name,
                account_type: account_type.to_string(),
                balance,
                icon_name: "Wallet".to_string(),
                user_id: Uuid::nil(),
                workspace_id,
                created_at: Utc::now(),
            })
    }

    pub fn arb_accounts(workspace_id: WorkspaceId) -> impl Strategy<Value = Vec<Account>> {
        prop::collection::vec(arb_account(workspace_id), 0..8)
    }

    /// One of the cache feature keys used by the sync layer.
    pub fn arb_feature_key() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "fintra_dashboard_data",
            "fintra_accounts_data",
            "fintra_transactions_data",
            "fintra_goals_data",
            "fintra_emi_data",
            "fintra_analytics_data",
            "fintra_budgeting_data",
            "fintra_members_data",
        ])
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built records for common scenarios.

    use super::*;

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
    }

    pub fn personal_workspace() -> Workspace {
        Workspace {
            id: Uuid::now_v7(),
            name: "Personal".to_string(),
            workspace_type: WorkspaceType::Personal,
            owner_id: Uuid::nil(),
            role: MemberRole::Admin,
            is_initial: true,
        }
    }

    pub fn organization_workspace() -> Workspace {
        Workspace {
            id: Uuid::now_v7(),
            name: "Household".to_string(),
            workspace_type: WorkspaceType::Organization,
            owner_id: Uuid::nil(),
            role: MemberRole::Admin,
            is_initial: false,
        }
    }

    pub fn account(workspace_id: WorkspaceId, name: &str, balance: f64) -> Account {
        Account {
            id: Uuid::now_v7(),
            name: name.to_string(),
            account_type: "Checking".to_string(),
            balance,
            icon_name: "Landmark".to_string(),
            user_id: Uuid::nil(),
            workspace_id,
            created_at: Utc::now(),
        }
    }

    pub fn expense(workspace_id: WorkspaceId, account_id: Option<EntityId>, title: &str, amount: f64) -> Expense {
        Expense {
            id: Uuid::now_v7(),
            title: title.to_string(),
            amount,
            category: "Food & Dining".to_string(),
            date: date(2024, 6, 1),
            time: None,
            description: None,
            account_id,
            user_id: Uuid::nil(),
            workspace_id,
            created_at: Utc::now(),
            verified: None,
            expense_items: Vec::new(),
        }
    }

    pub fn top_up(workspace_id: WorkspaceId, account_id: EntityId, amount: f64) -> TopUp {
        TopUp {
            id: Uuid::now_v7(),
            account_id,
            amount,
            name: "Salary".to_string(),
            description: None,
            topup_time: Utc::now(),
            user_id: Uuid::nil(),
            workspace_id,
            created_at: Utc::now(),
        }
    }

    pub fn recurring_income(workspace_id: WorkspaceId, account_id: EntityId, amount: f64) -> RecurringIncome {
        RecurringIncome {
            id: Uuid::now_v7(),
            account_id,
            amount,
            name: "Salary".to_string(),
            day_of_month: 1,
            is_active: true,
            user_id: Uuid::nil(),
            workspace_id,
            created_at: Utc::now(),
        }
    }

    pub fn goal(workspace_id: WorkspaceId, title: &str, target_amount: f64) -> Goal {
        Goal {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: String::new(),
            icon_name: "Target".to_string(),
            target_amount,
            current_amount: 0.0,
            target_date: date(2025, 12, 31),
            status: GoalStatus::Pending,
            user_id: Uuid::nil(),
            workspace_id,
            created_at: Utc::now(),
            goal_payments: Vec::new(),
        }
    }

    pub fn emi(workspace_id: WorkspaceId, name: &str, monthly_payment: f64) -> Emi {
        Emi {
            id: Uuid::now_v7(),
            name: name.to_string(),
            total_amount: monthly_payment * 12.0,
            monthly_payment,
            start_date: date(2024, 1, 1),
            end_date: date(2024, 12, 31),
            due_date_of_month: 5,
            user_id: Uuid::nil(),
            workspace_id,
            created_at: Utc::now(),
            emi_payments: Vec::new(),
        }
    }

    pub fn member(display_name: &str, role: MemberRole) -> Member {
        Member {
            id: Uuid::now_v7(),
            display_name: display_name.to_string(),
            role,
        }
    }

    pub fn new_expense(title: &str, amount: f64) -> NewExpense {
        NewExpense {
            account_id: None,
            title: title.to_string(),
            amount,
            category: "Food & Dining".to_string(),
            date: date(2024, 6, 2),
            time: None,
            description: None,
            items: Vec::new(),
        }
    }

    /// A remote holding `workspace` with the given accounts.
    pub fn remote_with_accounts(workspace: &Workspace, accounts: Vec<Account>) -> MockRemote {
        let remote = MockRemote::new();
        remote.update(|d| {
            d.workspaces.push(workspace.clone());
            d.accounts.insert(workspace.id, accounts);
        });
        remote
    }
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for Fintra results.

    use super::*;

    #[track_caller]
    pub fn assert_ok<T: std::fmt::Debug>(result: &FintraResult<T>) {
        assert!(result.is_ok(), "Expected Ok, got Err: {:?}", result);
    }

    /// Assert the result failed with a remote error whose message is `message`.
    #[track_caller]
    pub fn assert_remote_message<T: std::fmt::Debug>(result: &FintraResult<T>, message: &str) {
        match result {
            Err(err @ FintraError::Remote(_)) => assert_eq!(err.user_message(), message),
            other => panic!("Expected Remote error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_validation_error<T: std::fmt::Debug>(result: &FintraResult<T>) {
        match result {
            Err(FintraError::Validation(_)) => {}
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_sync_error<T: std::fmt::Debug>(result: &FintraResult<T>) {
        match result {
            Err(FintraError::Sync(_)) => {}
            other => panic!("Expected Sync error, got: {:?}", other),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_are_workspace_scoped() {
        let home = fixtures::personal_workspace();
        let office = fixtures::organization_workspace();
        let remote = fixtures::remote_with_accounts(&home, vec![fixtures::account(home.id, "Wallet", 5.0)]);

        assert_eq!(remote.get_accounts(home.id).await.unwrap().len(), 1);
        assert!(remote.get_accounts(office.id).await.unwrap().is_empty());
        assert_eq!(remote.calls("get_accounts"), 2);
    }

    #[tokio::test]
    async fn test_injected_failure_until_cleared() {
        let remote = MockRemote::new();
        remote.fail_with("delete_account", RemoteError::transport("delete_account", "network error"));

        let err = remote.delete_account(Uuid::now_v7()).await.unwrap_err();
        assert_eq!(err.to_string(), "network error");

        remote.clear_failure("delete_account");
        assert!(remote.delete_account(Uuid::now_v7()).await.is_ok());
    }

    #[tokio::test]
    async fn test_gate_holds_one_call() {
        let ws = fixtures::personal_workspace();
        let ws_id = ws.id;
        let remote = Arc::new(fixtures::remote_with_accounts(&ws, Vec::new()));
        let gate = remote.gate_next("get_accounts");

        let held = {
            let remote = Arc::clone(&remote);
            tokio::spawn(async move { remote.get_accounts(ws_id).await })
        };
        remote.wait_for_calls("get_accounts", 1).await;

        // Second call is not gated.
        assert!(remote.get_accounts(ws_id).await.is_ok());
        assert!(!held.is_finished());

        gate.notify_one();
        assert!(held.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_delete_expense_refunds_account() {
        let ws = fixtures::personal_workspace();
        let account = fixtures::account(ws.id, "Wallet", 100.0);
        let expense = fixtures::expense(ws.id, Some(account.id), "Lunch", 20.0);
        let remote = fixtures::remote_with_accounts(&ws, vec![account.clone()]);
        remote.update(|d| {
            d.expenses.insert(ws.id, vec![expense.clone()]);
        });

        remote.delete_expense(expense.id).await.unwrap();
        let data = remote.data();
        assert!(data.expenses[&ws.id].is_empty());
        assert_eq!(data.accounts[&ws.id][0].balance, 120.0);
    }

    #[tokio::test]
    async fn test_static_extractor_parses_fenced_output() {
        let extractor = StaticReceiptExtractor::new("```json\n{\"title\":\"Cafe\",\"items\":[]}\n```");
        let details = extractor.extract("aW1n").await.unwrap();
        assert_eq!(details.title.as_deref(), Some("Cafe"));
    }
}
