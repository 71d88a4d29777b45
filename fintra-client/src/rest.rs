//! REST client for the managed backend (PostgREST dialect).
//!
//! Table reads go to `/rest/v1/<table>` with filter query pairs; named
//! procedures go to `/rest/v1/rpc/<name>` as JSON POSTs. Error bodies of
//! the form `{"message": ...}` surface their message verbatim.

use crate::config::ClientConfig;
use crate::service::{RemoteDataService, RemoteResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use fintra_core::{
    Account, BudgetInput, BudgetPeriod, CategoryBudget, ConfigError, Emi, EntityId, Expense,
    Goal, Member, MemberRole, NetWorthPoint, NetWorthRange, NewAccount, NewEmi, NewExpense,
    NewGoal, NewRecurringIncome, NewTopUp, PaymentInput, PredictedBudget, RecurringIncome,
    RemoteError, TopUp, UserId, Workspace, WorkspaceId, WorkspaceType,
};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

const EXPENSE_SELECT: &str = "*,expense_items(*)";
const EXPENSE_ORDER: &str = "date.desc.nullslast,created_at.desc";

#[derive(Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: HeaderMap,
    user_id: UserId,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                field: "client".to_string(),
                value: config.api_base_url.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim().trim_end_matches('/').to_string(),
            auth_header: build_auth_headers(config)?,
            user_id: config.user_id,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, name)
    }

    async fn select<T>(&self, table: &str, query: &[(&str, String)]) -> RemoteResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(table, "select");
        let response = self
            .client
            .get(self.table_url(table))
            .headers(self.auth_header.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(table, e))?;
        parse_response(table, response).await
    }

    async fn rpc<T, B>(&self, name: &str, body: &B) -> RemoteResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        tracing::debug!(rpc = name, "rpc call");
        let response = self
            .client
            .post(self.rpc_url(name))
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(name, e))?;
        parse_response(name, response).await
    }

    async fn rpc_unit(&self, name: &str, body: &Value) -> RemoteResult<()> {
        tracing::debug!(rpc = name, "rpc call");
        let response = self
            .client
            .post(self.rpc_url(name))
            .headers(self.auth_header.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(name, e))?;
        check_response(name, response).await
    }

    async fn insert(&self, table: &str, row: &Value) -> RemoteResult<()> {
        tracing::debug!(table, "insert");
        let response = self
            .client
            .post(self.table_url(table))
            .headers(self.auth_header.clone())
            .header("prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| transport_error(table, e))?;
        check_response(table, response).await
    }

    async fn update(&self, table: &str, id: EntityId, changes: &Value) -> RemoteResult<()> {
        tracing::debug!(table, %id, "update");
        let response = self
            .client
            .patch(self.table_url(table))
            .headers(self.auth_header.clone())
            .header("prefer", "return=minimal")
            .query(&[("id", format!("eq.{id}"))])
            .json(changes)
            .send()
            .await
            .map_err(|e| transport_error(table, e))?;
        check_response(table, response).await
    }

    async fn delete(&self, table: &str, id: EntityId) -> RemoteResult<()> {
        tracing::debug!(table, %id, "delete");
        let response = self
            .client
            .delete(self.table_url(table))
            .headers(self.auth_header.clone())
            .query(&[("id", format!("eq.{id}"))])
            .send()
            .await
            .map_err(|e| transport_error(table, e))?;
        check_response(table, response).await
    }
}

fn workspace_filter(workspace_id: WorkspaceId) -> (&'static str, String) {
    ("workspace_id", format!("eq.{workspace_id}"))
}

#[async_trait]
impl RemoteDataService for RestClient {
    async fn get_workspaces(&self) -> RemoteResult<Vec<Workspace>> {
        self.rpc("get_workspaces_for_user", &json!({})).await
    }

    async fn create_workspace(
        &self,
        name: &str,
        workspace_type: WorkspaceType,
    ) -> RemoteResult<WorkspaceId> {
        self.rpc(
            "create_workspace",
            &json!({ "p_name": name, "p_type": workspace_type.as_db_str() }),
        )
        .await
    }

    async fn delete_workspace(&self, workspace_id: WorkspaceId) -> RemoteResult<()> {
        self.rpc_unit("delete_workspace", &json!({ "p_workspace_id": workspace_id }))
            .await
    }

    async fn get_workspace_members(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Member>> {
        let rows: Vec<MemberRow> = self
            .select(
                "workspace_members",
                &[
                    ("select", "user_id,role,users(full_name,id)".to_string()),
                    workspace_filter(workspace_id),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(MemberRow::into_member).collect())
    }

    async fn add_member(
        &self,
        workspace_id: WorkspaceId,
        email: &str,
        role: MemberRole,
    ) -> RemoteResult<()> {
        self.rpc_unit(
            "add_workspace_member",
            &json!({
                "p_workspace_id": workspace_id,
                "p_user_email": email,
                "p_role": role.as_db_str(),
            }),
        )
        .await
    }

    async fn update_member_role(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: MemberRole,
    ) -> RemoteResult<()> {
        self.rpc_unit(
            "update_workspace_member_role",
            &json!({
                "p_workspace_id": workspace_id,
                "p_user_id": user_id,
                "p_new_role": role.as_db_str(),
            }),
        )
        .await
    }

    async fn remove_member(&self, workspace_id: WorkspaceId, user_id: UserId) -> RemoteResult<()> {
        self.rpc_unit(
            "delete_workspace_member",
            &json!({ "p_workspace_id": workspace_id, "p_user_id": user_id }),
        )
        .await
    }

    async fn get_accounts(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Account>> {
        self.rpc(
            "get_accounts_for_workspace",
            &json!({ "p_workspace_id": workspace_id }),
        )
        .await
    }

    async fn get_goals(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Goal>> {
        self.select(
            "goals",
            &[
                ("select", "*,goal_payments(*)".to_string()),
                workspace_filter(workspace_id),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn get_expenses(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Expense>> {
        self.select(
            "expenses",
            &[
                ("select", EXPENSE_SELECT.to_string()),
                workspace_filter(workspace_id),
                ("order", EXPENSE_ORDER.to_string()),
            ],
        )
        .await
    }

    async fn get_expenses_between(
        &self,
        workspace_id: WorkspaceId,
        from: NaiveDate,
        until: NaiveDate,
    ) -> RemoteResult<Vec<Expense>> {
        self.select(
            "expenses",
            &[
                ("select", EXPENSE_SELECT.to_string()),
                workspace_filter(workspace_id),
                ("date", format!("gte.{from}")),
                ("date", format!("lt.{until}")),
                ("order", EXPENSE_ORDER.to_string()),
            ],
        )
        .await
    }

    async fn get_top_ups(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<TopUp>> {
        self.select(
            "topups",
            &[("select", "*".to_string()), workspace_filter(workspace_id)],
        )
        .await
    }

    async fn get_recurring_incomes(
        &self,
        workspace_id: WorkspaceId,
    ) -> RemoteResult<Vec<RecurringIncome>> {
        self.select(
            "recurring_incomes",
            &[
                ("select", "*".to_string()),
                workspace_filter(workspace_id),
                ("order", "created_at".to_string()),
            ],
        )
        .await
    }

    async fn get_emis(&self, workspace_id: WorkspaceId) -> RemoteResult<Vec<Emi>> {
        self.select(
            "emis",
            &[
                ("select", "*,emi_payments(*)".to_string()),
                workspace_filter(workspace_id),
                ("order", "due_date_of_month".to_string()),
            ],
        )
        .await
    }

    async fn get_category_budgets(
        &self,
        workspace_id: WorkspaceId,
        period: BudgetPeriod,
    ) -> RemoteResult<Vec<CategoryBudget>> {
        self.select(
            "category_budgets",
            &[
                ("select", "*".to_string()),
                workspace_filter(workspace_id),
                ("year", format!("eq.{}", period.year)),
                ("month", format!("eq.{}", period.month)),
            ],
        )
        .await
    }

    async fn get_predicted_budgets(
        &self,
        workspace_id: WorkspaceId,
    ) -> RemoteResult<Vec<PredictedBudget>> {
        self.rpc(
            "get_predicted_spending",
            &json!({ "p_workspace_id": workspace_id }),
        )
        .await
    }

    async fn get_net_worth_history(
        &self,
        workspace_id: WorkspaceId,
        range: NetWorthRange,
    ) -> RemoteResult<Vec<NetWorthPoint>> {
        self.rpc("get_net_worth_history", &net_worth_params(workspace_id, &range))
            .await
    }

    async fn add_expense(
        &self,
        workspace_id: WorkspaceId,
        expense: &NewExpense,
    ) -> RemoteResult<()> {
        self.rpc_unit(
            "add_expense",
            &add_expense_params(self.user_id, workspace_id, expense),
        )
        .await
    }

    async fn update_expense(&self, expense_id: EntityId, expense: &NewExpense) -> RemoteResult<()> {
        self.rpc_unit(
            "update_expense",
            &update_expense_params(self.user_id, expense_id, expense),
        )
        .await
    }

    async fn delete_expense(&self, expense_id: EntityId) -> RemoteResult<()> {
        self.rpc_unit(
            "delete_expense",
            &json!({ "p_expense_id": expense_id, "p_user_id": self.user_id }),
        )
        .await
    }

    async fn add_top_up(&self, workspace_id: WorkspaceId, top_up: &NewTopUp) -> RemoteResult<()> {
        self.rpc_unit(
            "add_topup",
            &json!({
                "p_account_id": top_up.account_id,
                "p_amount": top_up.amount,
                "p_name": top_up.name,
                "p_description": top_up.description,
                "p_topup_time": top_up.topup_time,
                "p_user_id": self.user_id,
                "p_workspace_id": workspace_id,
            }),
        )
        .await
    }

    async fn update_top_up(&self, top_up_id: EntityId, top_up: &NewTopUp) -> RemoteResult<()> {
        self.update("topups", top_up_id, &to_row("topups", top_up)?)
            .await
    }

    async fn delete_top_up(&self, top_up_id: EntityId) -> RemoteResult<()> {
        self.rpc_unit("delete_topup", &json!({ "p_topup_id": top_up_id }))
            .await
    }

    async fn add_recurring_income(
        &self,
        workspace_id: WorkspaceId,
        income: &NewRecurringIncome,
    ) -> RemoteResult<()> {
        let row = owned_row("recurring_incomes", income, self.user_id, workspace_id)?;
        self.insert("recurring_incomes", &row).await
    }

    async fn update_recurring_income(
        &self,
        income_id: EntityId,
        income: &NewRecurringIncome,
    ) -> RemoteResult<()> {
        self.update("recurring_incomes", income_id, &to_row("recurring_incomes", income)?)
            .await
    }

    async fn delete_recurring_income(&self, income_id: EntityId) -> RemoteResult<()> {
        self.delete("recurring_incomes", income_id).await
    }

    async fn add_account(
        &self,
        workspace_id: WorkspaceId,
        account: &NewAccount,
    ) -> RemoteResult<()> {
        let row = owned_row("accounts", account, self.user_id, workspace_id)?;
        self.insert("accounts", &row).await
    }

    async fn delete_account(&self, account_id: EntityId) -> RemoteResult<()> {
        self.rpc_unit("delete_account", &json!({ "p_account_id": account_id }))
            .await
    }

    async fn share_account_with_workspaces(
        &self,
        account_id: EntityId,
        workspace_ids: &[WorkspaceId],
    ) -> RemoteResult<()> {
        self.rpc_unit(
            "share_account_with_workspaces",
            &json!({ "p_account_id": account_id, "p_workspace_ids": workspace_ids }),
        )
        .await
    }

    async fn add_goal(&self, workspace_id: WorkspaceId, goal: &NewGoal) -> RemoteResult<()> {
        let row = owned_row("goals", goal, self.user_id, workspace_id)?;
        self.insert("goals", &row).await
    }

    async fn update_goal(&self, goal_id: EntityId, goal: &NewGoal) -> RemoteResult<()> {
        self.rpc_unit(
            "update_goal",
            &json!({
                "p_goal_id": goal_id,
                "p_title": goal.title,
                "p_description": goal.description,
                "p_target_amount": goal.target_amount,
                "p_current_amount": goal.current_amount,
                "p_target_date": goal.target_date,
                "p_status": goal.status.as_db_str(),
                "p_icon_name": goal.icon_name,
            }),
        )
        .await
    }

    async fn delete_goal(&self, goal_id: EntityId) -> RemoteResult<()> {
        self.rpc_unit("delete_goal", &json!({ "p_goal_id": goal_id }))
            .await
    }

    async fn add_goal_payment(
        &self,
        goal_id: EntityId,
        goal_title: &str,
        payment: &PaymentInput,
    ) -> RemoteResult<()> {
        let mut params = add_payment_params(self.user_id, payment, &format!("Goal: {goal_title}"));
        params["p_goal_id"] = json!(goal_id);
        self.rpc_unit("add_goal_payment", &params).await
    }

    async fn update_goal_payment(
        &self,
        payment_id: EntityId,
        payment: &PaymentInput,
    ) -> RemoteResult<()> {
        self.rpc_unit("update_goal_payment", &update_payment_params(payment_id, payment))
            .await
    }

    async fn delete_goal_payment(&self, payment_id: EntityId) -> RemoteResult<()> {
        self.rpc_unit("delete_goal_payment", &json!({ "p_payment_id": payment_id }))
            .await
    }

    async fn add_emi(&self, workspace_id: WorkspaceId, emi: &NewEmi) -> RemoteResult<()> {
        let row = owned_row("emis", emi, self.user_id, workspace_id)?;
        self.insert("emis", &row).await
    }

    async fn delete_emi(&self, emi_id: EntityId) -> RemoteResult<()> {
        self.rpc_unit("delete_emi", &json!({ "p_emi_id": emi_id }))
            .await
    }

    async fn add_emi_payment(
        &self,
        emi_id: EntityId,
        emi_name: &str,
        payment: &PaymentInput,
    ) -> RemoteResult<()> {
        let mut params = add_payment_params(self.user_id, payment, &format!("EMI: {emi_name}"));
        params["p_emi_id"] = json!(emi_id);
        self.rpc_unit("add_emi_payment", &params).await
    }

    async fn update_emi_payment(
        &self,
        payment_id: EntityId,
        payment: &PaymentInput,
    ) -> RemoteResult<()> {
        self.rpc_unit("update_emi_payment", &update_payment_params(payment_id, payment))
            .await
    }

    async fn delete_emi_payment(&self, payment_id: EntityId) -> RemoteResult<()> {
        self.rpc_unit("delete_emi_payment", &json!({ "p_payment_id": payment_id }))
            .await
    }

    async fn upsert_budgets(
        &self,
        workspace_id: WorkspaceId,
        period: BudgetPeriod,
        budgets: &[BudgetInput],
    ) -> RemoteResult<()> {
        self.rpc_unit(
            "upsert_category_budgets",
            &budget_params(self.user_id, workspace_id, period, budgets),
        )
        .await
    }
}

// ============================================================================
// WIRE HELPERS
// ============================================================================

/// Row shape of `workspace_members` joined with `users`.
#[derive(Debug, Deserialize)]
struct MemberRow {
    user_id: UserId,
    role: MemberRole,
    users: Option<MemberUser>,
}

#[derive(Debug, Deserialize)]
struct MemberUser {
    full_name: Option<String>,
}

impl MemberRow {
    fn into_member(self) -> Member {
        Member {
            id: self.user_id,
            display_name: self
                .users
                .and_then(|u| u.full_name)
                .unwrap_or_else(|| "Unknown User".to_string()),
            role: self.role,
        }
    }
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
struct BackendErrorBody {
    message: String,
}

fn to_row<T: Serialize>(operation: &str, value: &T) -> RemoteResult<Value> {
    serde_json::to_value(value).map_err(|e| RemoteError::InvalidResponse {
        operation: operation.to_string(),
        reason: e.to_string(),
    })
}

fn owned_row<T: Serialize>(
    operation: &str,
    value: &T,
    user_id: UserId,
    workspace_id: WorkspaceId,
) -> RemoteResult<Value> {
    let mut row = to_row(operation, value)?;
    row["user_id"] = json!(user_id);
    row["workspace_id"] = json!(workspace_id);
    Ok(row)
}

fn expense_items(expense: &NewExpense) -> Value {
    json!(expense
        .items
        .iter()
        .map(|i| json!({ "name": i.name, "price": i.price, "quantity": i.quantity }))
        .collect::<Vec<_>>())
}

fn add_expense_params(user_id: UserId, workspace_id: WorkspaceId, expense: &NewExpense) -> Value {
    json!({
        "p_user_id": user_id,
        "p_account_id": expense.account_id,
        "p_title": expense.title,
        "p_amount": expense.amount,
        "p_category": expense.category,
        "p_date": expense.date,
        "p_time": expense.time,
        "p_description": expense.description,
        "p_items": expense_items(expense),
        "p_workspace_id": workspace_id,
    })
}

fn update_expense_params(user_id: UserId, expense_id: EntityId, expense: &NewExpense) -> Value {
    json!({
        "p_expense_id": expense_id,
        "p_user_id": user_id,
        "p_new_account_id": expense.account_id,
        "p_new_title": expense.title,
        "p_new_amount": expense.amount,
        "p_new_category": expense.category,
        "p_new_date": expense.date,
        "p_new_time": expense.time,
        "p_new_description": expense.description,
        "p_new_items": expense_items(expense),
    })
}

fn add_payment_params(user_id: UserId, payment: &PaymentInput, expense_title: &str) -> Value {
    json!({
        "p_account_id": payment.account_id,
        "p_amount": payment.amount,
        "p_payment_type": payment.payment_type.as_db_str(),
        "p_date": payment.payment_date,
        "p_expense_title": expense_title,
        "p_user_id": user_id,
    })
}

fn update_payment_params(payment_id: EntityId, payment: &PaymentInput) -> Value {
    json!({
        "p_payment_id": payment_id,
        "p_new_account_id": payment.account_id,
        "p_new_amount": payment.amount,
        "p_new_payment_type": payment.payment_type.as_db_str(),
        "p_new_date": payment.payment_date,
    })
}

fn budget_params(
    user_id: UserId,
    workspace_id: WorkspaceId,
    period: BudgetPeriod,
    budgets: &[BudgetInput],
) -> Value {
    let rows: Vec<_> = budgets
        .iter()
        .map(|b| {
            json!({
                "user_id": user_id,
                "workspace_id": workspace_id,
                "year": period.year,
                "month": period.month,
                "category": b.category,
                "amount": b.amount,
            })
        })
        .collect();
    json!({ "budgets": rows })
}

fn net_worth_params(workspace_id: WorkspaceId, range: &NetWorthRange) -> Value {
    json!({
        "p_workspace_id": workspace_id,
        "p_start_date": range.start,
        "p_end_date": range.end,
        "p_time_interval": range.interval.as_db_str(),
    })
}

fn transport_error(operation: &str, err: reqwest::Error) -> RemoteError {
    let message = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "network error".to_string()
    } else {
        err.to_string()
    };
    tracing::warn!(operation, error = %err, "request failed");
    RemoteError::transport(operation, message)
}

/// Map a non-success body to a [`RemoteError`], preferring the backend message.
fn error_from_body(operation: &str, status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<BackendErrorBody>(body) {
        Ok(parsed) => RemoteError::rejected(operation, parsed.message),
        Err(_) => RemoteError::Status {
            operation: operation.to_string(),
            status,
            body: body.to_string(),
        },
    }
}

async fn parse_response<T: DeserializeOwned>(
    operation: &str,
    response: reqwest::Response,
) -> RemoteResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(operation, e))?;
    if !status.is_success() {
        return Err(error_from_body(operation, status.as_u16(), &text));
    }
    decode_body(operation, &text)
}

/// Decode a success body. Empty bodies decode as JSON `null`, which lets
/// list reads of void procedures fall through to a clear error.
fn decode_body<T: DeserializeOwned>(operation: &str, text: &str) -> RemoteResult<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| RemoteError::InvalidResponse {
        operation: operation.to_string(),
        reason: e.to_string(),
    })
}

async fn check_response(operation: &str, response: reqwest::Response) -> RemoteResult<()> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let text = response
        .text()
        .await
        .map_err(|e| transport_error(operation, e))?;
    Err(error_from_body(operation, status.as_u16(), &text))
}

fn build_auth_headers(config: &ClientConfig) -> Result<HeaderMap, ConfigError> {
    let invalid = |field: &str, e: reqwest::header::InvalidHeaderValue| ConfigError::InvalidValue {
        field: field.to_string(),
        value: "<redacted>".to_string(),
        reason: e.to_string(),
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("apikey"),
        HeaderValue::from_str(&config.auth.anon_key)
            .map_err(|e| invalid("client.auth.anon_key", e))?,
    );
    let token = config
        .auth
        .access_token
        .as_deref()
        .unwrap_or(&config.auth.anon_key);
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| invalid("client.auth.access_token", e))?,
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use fintra_core::{ExpenseItemInput, NetWorthInterval, PaymentType};
    use uuid::Uuid;

    fn config() -> ClientConfig {
        ClientConfig {
            api_base_url: "https://project.supabase.co/".to_string(),
            auth: AuthConfig {
                anon_key: "anon-key".to_string(),
                access_token: None,
            },
            user_id: Uuid::nil(),
            request_timeout_ms: 5_000,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_urls_trim_trailing_slash() {
        let client = RestClient::new(&config()).unwrap();
        assert_eq!(
            client.rpc_url("delete_expense"),
            "https://project.supabase.co/rest/v1/rpc/delete_expense"
        );
        assert_eq!(
            client.table_url("expenses"),
            "https://project.supabase.co/rest/v1/expenses"
        );
    }

    #[test]
    fn test_auth_falls_back_to_anon_key() {
        let headers = build_auth_headers(&config()).unwrap();
        assert_eq!(headers.get("apikey").unwrap(), "anon-key");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer anon-key");
    }

    #[test]
    fn test_error_body_message_is_verbatim() {
        let body = r#"{"code":"P0001","message":"Insufficient balance","details":null,"hint":null}"#;
        let err = error_from_body("add_expense", 400, body);
        assert_eq!(err, RemoteError::rejected("add_expense", "Insufficient balance"));
        assert_eq!(err.to_string(), "Insufficient balance");
    }

    #[test]
    fn test_error_without_json_body_keeps_status() {
        let err = error_from_body("expenses", 502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP 502: Bad Gateway");
    }

    #[test]
    fn test_empty_success_body_decodes_as_null() {
        let value: Option<Vec<u8>> = decode_body("delete_goal", "").unwrap();
        assert!(value.is_none());
        assert!(decode_body::<Vec<u8>>("get_goals", "").is_err());
    }

    #[test]
    fn test_member_row_mapping() {
        let row: MemberRow = serde_json::from_str(
            r#"{"user_id":"00000000-0000-0000-0000-000000000001","role":"admin","users":null}"#,
        )
        .unwrap();
        let member = row.into_member();
        assert_eq!(member.display_name, "Unknown User");
        assert_eq!(member.role, MemberRole::Admin);
    }

    #[test]
    fn test_add_expense_params_shape() {
        let expense = NewExpense {
            account_id: None,
            title: "Lunch".to_string(),
            amount: 9.5,
            category: "Dining".to_string(),
            date: date(2024, 6, 1),
            time: None,
            description: None,
            items: vec![ExpenseItemInput {
                name: "Soup".to_string(),
                price: 9.5,
                quantity: 1,
            }],
        };
        let ws = Uuid::now_v7();
        let params = add_expense_params(Uuid::nil(), ws, &expense);
        assert_eq!(params["p_title"], "Lunch");
        assert_eq!(params["p_date"], "2024-06-01");
        assert_eq!(params["p_time"], Value::Null);
        assert_eq!(params["p_items"][0]["quantity"], 1);
        assert_eq!(params["p_workspace_id"], json!(ws));
    }

    #[test]
    fn test_payment_params_shape() {
        let payment = PaymentInput {
            account_id: Uuid::nil(),
            amount: 100.0,
            payment_type: PaymentType::Sip,
            payment_date: date(2024, 3, 5),
        };
        let params = add_payment_params(Uuid::nil(), &payment, "Goal: Trip");
        assert_eq!(params["p_payment_type"], "SIP");
        assert_eq!(params["p_expense_title"], "Goal: Trip");

        let update = update_payment_params(Uuid::nil(), &payment);
        assert_eq!(update["p_new_date"], "2024-03-05");
    }

    #[test]
    fn test_budget_and_net_worth_params() {
        let period = BudgetPeriod { year: 2024, month: 7 };
        let params = budget_params(
            Uuid::nil(),
            Uuid::nil(),
            period,
            &[BudgetInput {
                category: "Dining".to_string(),
                amount: 200.0,
            }],
        );
        assert_eq!(params["budgets"][0]["month"], 7);
        assert_eq!(params["budgets"][0]["category"], "Dining");

        let range = NetWorthRange {
            start: date(2023, 7, 1),
            end: date(2024, 7, 1),
            interval: NetWorthInterval::Month,
        };
        let params = net_worth_params(Uuid::nil(), &range);
        assert_eq!(params["p_time_interval"], "month");
        assert_eq!(params["p_start_date"], "2023-07-01");
    }

    #[test]
    fn test_owned_row_adds_scope() {
        let ws = Uuid::now_v7();
        let row = owned_row(
            "accounts",
            &NewAccount {
                name: "Wallet".to_string(),
                account_type: "Checking".to_string(),
                balance: 10.0,
                icon_name: "Wallet".to_string(),
            },
            Uuid::nil(),
            ws,
        )
        .unwrap();
        assert_eq!(row["type"], "Checking");
        assert_eq!(row["workspace_id"], json!(ws));
    }
}
