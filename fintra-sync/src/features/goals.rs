use super::{labelled, loaded, Feature};
use crate::optimistic::{confirmed_mutate, optimistic_mutate};
use crate::page::PageSync;
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    Account, EntityId, FintraResult, Goal, NewGoal, PaymentInput, ValidationError, Workspace,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default)]
pub struct Goals;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalsSnapshot {
    pub goals: Vec<Goal>,
    pub accounts: Vec<Account>,
}

impl GoalsSnapshot {
    pub fn goal(&self, goal_id: EntityId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == goal_id)
    }
}

#[async_trait]
impl Feature for Goals {
    type Snapshot = GoalsSnapshot;
    const KEY: &'static str = "fintra_goals_data";
    const NAME: &'static str = "Goals";

    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<GoalsSnapshot> {
        let (goals, accounts) = tokio::try_join!(
            labelled("Goals", remote.get_goals(workspace.id)),
            labelled("Accounts", remote.get_accounts(workspace.id)),
        )?;
        Ok(GoalsSnapshot { goals, accounts })
    }
}

impl PageSync<Goals> {
    pub async fn add_goal(&self, goal: NewGoal) -> FintraResult<()> {
        goal.validate()?;
        let workspace_id = self.workspace().id;
        confirmed_mutate(self, self.remote().add_goal(workspace_id, &goal)).await
    }

    pub async fn update_goal(&self, goal_id: EntityId, goal: NewGoal) -> FintraResult<()> {
        goal.validate()?;
        confirmed_mutate(self, self.remote().update_goal(goal_id, &goal)).await
    }

    pub async fn delete_goal(&self, goal_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| s.goals.retain(|g| g.id != goal_id),
            self.remote().delete_goal(goal_id),
        )
        .await
    }

    /// The goal must be on screen: its title labels the booked expense.
    pub async fn add_goal_payment(&self, goal_id: EntityId, payment: PaymentInput) -> FintraResult<()> {
        payment.validate()?;
        let snapshot = loaded(self)?;
        let title = snapshot
            .goal(goal_id)
            .map(|g| g.title.clone())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "goal_id".to_string(),
                reason: format!("goal {goal_id} is not loaded"),
            })?;
        confirmed_mutate(
            self,
            self.remote().add_goal_payment(goal_id, &title, &payment),
        )
        .await
    }

    pub async fn update_goal_payment(
        &self,
        payment_id: EntityId,
        payment: PaymentInput,
    ) -> FintraResult<()> {
        payment.validate()?;
        confirmed_mutate(self, self.remote().update_goal_payment(payment_id, &payment)).await
    }

    pub async fn delete_goal_payment(&self, payment_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| {
                for goal in &mut s.goals {
                    if let Some(pos) = goal.goal_payments.iter().position(|p| p.id == payment_id) {
                        let payment = goal.goal_payments.remove(pos);
                        goal.current_amount = (goal.current_amount - payment.amount).max(0.0);
                    }
                }
            },
            self.remote().delete_goal_payment(payment_id),
        )
        .await
    }
}
