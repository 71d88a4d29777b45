use super::{labelled, Feature};
use crate::optimistic::optimistic_mutate;
use crate::page::PageSync;
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    budget_progress, new_entity_id, predicted_progress, spending_per_category, BudgetInput,
    BudgetPeriod, BudgetProgress, CategoryBudget, Expense, FintraResult, PredictedBudget,
    ValidationError, Workspace,
};
use serde::{Deserialize, Serialize};

/// Category budgets for one calendar month.
#[derive(Debug, Clone, Copy)]
pub struct Budgeting {
    pub period: BudgetPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetingSnapshot {
    pub period: BudgetPeriod,
    pub budgets: Vec<CategoryBudget>,
    pub predicted_budgets: Vec<PredictedBudget>,
    /// Expenses dated inside `period`.
    pub expenses: Vec<Expense>,
}

impl BudgetingSnapshot {
    pub fn progress(&self) -> Vec<BudgetProgress> {
        budget_progress(&self.budgets, &spending_per_category(&self.expenses))
    }

    pub fn predicted_progress(&self) -> Vec<BudgetProgress> {
        predicted_progress(&self.predicted_budgets, &spending_per_category(&self.expenses))
    }
}

fn period_bounds(period: BudgetPeriod) -> Result<(chrono::NaiveDate, chrono::NaiveDate), ValidationError> {
    period
        .first_day()
        .zip(period.next_first_day())
        .ok_or_else(|| ValidationError::InvalidValue {
            field: "period".to_string(),
            reason: format!("{}-{:02} is not a calendar month", period.year, period.month),
        })
}

#[async_trait]
impl Feature for Budgeting {
    type Snapshot = BudgetingSnapshot;
    const KEY: &'static str = "fintra_budgeting_data";
    const NAME: &'static str = "Budgeting";

    fn cache_feature(&self) -> String {
        format!("{}_{}-{:02}", Self::KEY, self.period.year, self.period.month)
    }

    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<BudgetingSnapshot> {
        let (from, until) = period_bounds(self.period)?;
        let id = workspace.id;
        let (budgets, predicted_budgets, expenses) = tokio::try_join!(
            labelled("Budgets", remote.get_category_budgets(id, self.period)),
            labelled("Predicted budgets", remote.get_predicted_budgets(id)),
            labelled("Expenses", remote.get_expenses_between(id, from, until)),
        )?;
        Ok(BudgetingSnapshot {
            period: self.period,
            budgets,
            predicted_budgets,
            expenses,
        })
    }
}

impl PageSync<Budgeting> {
    /// Replace the month's budgets. Categories not listed keep their budget.
    pub async fn upsert_budgets(&self, budgets: Vec<BudgetInput>) -> FintraResult<()> {
        for budget in &budgets {
            budget.validate()?;
        }
        let period = self.feature().period;
        let workspace = self.workspace().clone();
        optimistic_mutate(
            self,
            |s| apply_budgets(&mut s.budgets, &budgets, period, &workspace),
            self.remote().upsert_budgets(workspace.id, period, &budgets),
        )
        .await
    }
}

fn apply_budgets(
    current: &mut Vec<CategoryBudget>,
    inputs: &[BudgetInput],
    period: BudgetPeriod,
    workspace: &Workspace,
) {
    for input in inputs {
        match current.iter_mut().find(|b| b.category == input.category) {
            Some(existing) => existing.amount = input.amount,
            None => current.push(CategoryBudget {
                id: new_entity_id(),
                category: input.category.clone(),
                amount: input.amount,
                year: period.year,
                month: period.month,
                user_id: workspace.owner_id,
                workspace_id: workspace.id,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintra_core::{MemberRole, WorkspaceType};
    use uuid::Uuid;

    #[test]
    fn test_cache_feature_includes_period() {
        let may = Budgeting {
            period: BudgetPeriod { year: 2024, month: 5 },
        };
        let june = Budgeting {
            period: BudgetPeriod { year: 2024, month: 6 },
        };
        assert_eq!(may.cache_feature(), "fintra_budgeting_data_2024-05");
        assert_ne!(may.cache_feature(), june.cache_feature());
    }

    #[test]
    fn test_period_bounds_cover_month() {
        let (from, until) = period_bounds(BudgetPeriod { year: 2024, month: 12 }).unwrap();
        assert_eq!(from.to_string(), "2024-12-01");
        assert_eq!(until.to_string(), "2025-01-01");
        assert!(period_bounds(BudgetPeriod { year: 2024, month: 13 }).is_err());
    }

    #[test]
    fn test_apply_budgets_updates_and_inserts() {
        let workspace = Workspace {
            id: Uuid::now_v7(),
            name: "Home".to_string(),
            workspace_type: WorkspaceType::Personal,
            owner_id: Uuid::nil(),
            role: MemberRole::Admin,
            is_initial: true,
        };
        let period = BudgetPeriod { year: 2024, month: 5 };
        let mut current = vec![CategoryBudget {
            id: Uuid::now_v7(),
            category: "Dining".to_string(),
            amount: 100.0,
            year: 2024,
            month: 5,
            user_id: Uuid::nil(),
            workspace_id: workspace.id,
        }];
        apply_budgets(
            &mut current,
            &[
                BudgetInput {
                    category: "Dining".to_string(),
                    amount: 150.0,
                },
                BudgetInput {
                    category: "Travel".to_string(),
                    amount: 40.0,
                },
            ],
            period,
            &workspace,
        );
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].amount, 150.0);
        assert_eq!(current[1].category, "Travel");
        assert_eq!(current[1].workspace_id, workspace.id);
    }
}
