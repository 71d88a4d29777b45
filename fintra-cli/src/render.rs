//! Plain-text rendering of page snapshots.

use fintra_core::{AccountTotals, BudgetProgress, Workspace, WorkspaceId};
use fintra_sync::{
    AccountsSnapshot, AnalyticsSnapshot, BudgetingSnapshot, DashboardSnapshot, EmiSnapshot,
    GoalsSnapshot, MembersSnapshot, PageError, PageState, TransactionsSnapshot,
};
use std::io::{self, Write};

pub fn workspaces<W: Write>(
    list: &[Workspace],
    current: Option<WorkspaceId>,
    out: &mut W,
) -> io::Result<()> {
    if list.is_empty() {
        return writeln!(out, "No workspaces");
    }
    for ws in list {
        let marker = if Some(ws.id) == current { "*" } else { " " };
        writeln!(
            out,
            "{marker} {}  {} ({}, {})",
            ws.id,
            ws.name,
            ws.workspace_type.as_db_str(),
            ws.role.as_db_str()
        )?;
    }
    Ok(())
}

/// Notes printed under a page: stale fetch errors and mutation banners.
pub fn status<S, W: Write>(state: &PageState<S>, out: &mut W) -> io::Result<()> {
    if let Some(PageError::Stale(message)) = &state.fetch_error {
        writeln!(out, "! showing older data: {message}")?;
    }
    if let Some(banner) = &state.banner {
        writeln!(out, "! {}", banner.message)?;
    }
    Ok(())
}

fn totals<W: Write>(totals: &AccountTotals, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "Assets {:.2}  Liabilities {:.2}  Net worth {:.2}",
        totals.assets,
        totals.liabilities,
        totals.net_worth()
    )
}

fn progress<W: Write>(rows: &[BudgetProgress], out: &mut W) -> io::Result<()> {
    for row in rows {
        let flag = if row.is_over_budget() { " over" } else { "" };
        writeln!(
            out,
            "  {:<24} {:>10.2} / {:>10.2}{flag}",
            row.category, row.spent, row.budgeted
        )?;
    }
    Ok(())
}

pub fn dashboard<W: Write>(snapshot: &DashboardSnapshot, out: &mut W) -> io::Result<()> {
    totals(&snapshot.totals(), out)?;
    writeln!(out, "Accounts")?;
    for account in &snapshot.accounts {
        writeln!(out, "  {:<24} {:>12.2}", account.name, account.balance)?;
    }
    writeln!(out, "Recent expenses")?;
    for expense in snapshot.expenses.iter().take(10) {
        writeln!(
            out,
            "  {}  {:<24} {:>10.2}  {}",
            expense.date, expense.title, expense.amount, expense.category
        )?;
    }
    writeln!(out, "Goals")?;
    for goal in &snapshot.goals {
        writeln!(
            out,
            "  {:<24} {:>10.2} / {:>10.2}  {}",
            goal.title,
            goal.current_amount,
            goal.target_amount,
            goal.status.as_db_str()
        )?;
    }
    Ok(())
}

pub fn accounts<W: Write>(snapshot: &AccountsSnapshot, out: &mut W) -> io::Result<()> {
    totals(&snapshot.totals(), out)?;
    let income = snapshot.monthly_income();
    for account in &snapshot.accounts {
        let monthly = income.get(&account.id).copied().unwrap_or(0.0);
        writeln!(
            out,
            "  {}  {:<24} {:<12} {:>12.2}  +{monthly:.2}/mo",
            account.id, account.name, account.account_type, account.balance
        )?;
    }
    Ok(())
}

pub fn transactions<W: Write>(snapshot: &TransactionsSnapshot, out: &mut W) -> io::Result<()> {
    writeln!(out, "Expenses")?;
    for expense in &snapshot.expenses {
        writeln!(
            out,
            "  {}  {}  {:<24} {:>10.2}",
            expense.id, expense.date, expense.title, expense.amount
        )?;
    }
    writeln!(out, "Top-ups")?;
    for top_up in &snapshot.top_ups {
        writeln!(
            out,
            "  {}  {}  {:<24} {:>10.2}",
            top_up.id,
            top_up.topup_time.date_naive(),
            top_up.name,
            top_up.amount
        )?;
    }
    Ok(())
}

pub fn goals<W: Write>(snapshot: &GoalsSnapshot, out: &mut W) -> io::Result<()> {
    for goal in &snapshot.goals {
        writeln!(
            out,
            "  {:<24} {:>10.2} / {:>10.2}  due {}  {} payments",
            goal.title,
            goal.current_amount,
            goal.target_amount,
            goal.target_date,
            goal.goal_payments.len()
        )?;
    }
    Ok(())
}

pub fn emis<W: Write>(snapshot: &EmiSnapshot, out: &mut W) -> io::Result<()> {
    for emi in &snapshot.emis {
        writeln!(
            out,
            "  {:<24} {:>10.2}/mo  day {:>2}  {} paid",
            emi.name,
            emi.monthly_payment,
            emi.due_date_of_month,
            emi.emi_payments.len()
        )?;
    }
    Ok(())
}

pub fn analytics<W: Write>(snapshot: &AnalyticsSnapshot, out: &mut W) -> io::Result<()> {
    writeln!(out, "Spending by category")?;
    for (category, amount) in snapshot.spending_by_category() {
        writeln!(out, "  {category:<24} {amount:>10.2}")?;
    }
    writeln!(out, "Top items")?;
    for item in snapshot.top_items().iter().take(10) {
        writeln!(
            out,
            "  {:<24} x{:<4} {:>10.2}",
            item.name, item.total_quantity, item.total_spent
        )?;
    }
    if let Some(last) = snapshot.net_worth_history.last() {
        writeln!(out, "Net worth on {}: {:.2}", last.snapshot_date, last.net_worth)?;
    }
    Ok(())
}

pub fn budgeting<W: Write>(snapshot: &BudgetingSnapshot, out: &mut W) -> io::Result<()> {
    writeln!(out, "Budgets for {}-{:02}", snapshot.period.year, snapshot.period.month)?;
    progress(&snapshot.progress(), out)?;
    writeln!(out, "Predicted")?;
    progress(&snapshot.predicted_progress(), out)
}

pub fn members<W: Write>(snapshot: &MembersSnapshot, out: &mut W) -> io::Result<()> {
    if snapshot.members.is_empty() {
        return writeln!(out, "No members (personal workspace)");
    }
    for member in &snapshot.members {
        writeln!(
            out,
            "  {}  {:<24} {}",
            member.id,
            member.display_name,
            member.role.as_db_str()
        )?;
    }
    Ok(())
}
