use super::{labelled, loaded, Feature};
use crate::optimistic::{confirmed_mutate, optimistic_mutate};
use crate::page::PageSync;
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    Account, Emi, EntityId, FintraResult, NewEmi, PaymentInput, ValidationError, Workspace,
};
use serde::{Deserialize, Serialize};

/// Installment loans and their payment history.
#[derive(Debug, Clone, Copy, Default)]
pub struct Emis;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmiSnapshot {
    pub emis: Vec<Emi>,
    pub accounts: Vec<Account>,
}

impl EmiSnapshot {
    pub fn emi(&self, emi_id: EntityId) -> Option<&Emi> {
        self.emis.iter().find(|e| e.id == emi_id)
    }
}

#[async_trait]
impl Feature for Emis {
    type Snapshot = EmiSnapshot;
    const KEY: &'static str = "fintra_emi_data";
    const NAME: &'static str = "EMIs";

    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<EmiSnapshot> {
        let (emis, accounts) = tokio::try_join!(
            labelled("EMIs", remote.get_emis(workspace.id)),
            labelled("Accounts", remote.get_accounts(workspace.id)),
        )?;
        Ok(EmiSnapshot { emis, accounts })
    }
}

impl PageSync<Emis> {
    pub async fn add_emi(&self, emi: NewEmi) -> FintraResult<()> {
        emi.validate()?;
        let workspace_id = self.workspace().id;
        confirmed_mutate(self, self.remote().add_emi(workspace_id, &emi)).await
    }

    pub async fn delete_emi(&self, emi_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| s.emis.retain(|e| e.id != emi_id),
            self.remote().delete_emi(emi_id),
        )
        .await
    }

    /// The EMI must be on screen: its name labels the booked expense.
    pub async fn add_emi_payment(&self, emi_id: EntityId, payment: PaymentInput) -> FintraResult<()> {
        payment.validate()?;
        let snapshot = loaded(self)?;
        let name = snapshot
            .emi(emi_id)
            .map(|e| e.name.clone())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "emi_id".to_string(),
                reason: format!("EMI {emi_id} is not loaded"),
            })?;
        confirmed_mutate(self, self.remote().add_emi_payment(emi_id, &name, &payment)).await
    }

    pub async fn update_emi_payment(
        &self,
        payment_id: EntityId,
        payment: PaymentInput,
    ) -> FintraResult<()> {
        payment.validate()?;
        confirmed_mutate(self, self.remote().update_emi_payment(payment_id, &payment)).await
    }

    pub async fn delete_emi_payment(&self, payment_id: EntityId) -> FintraResult<()> {
        optimistic_mutate(
            self,
            |s| {
                for emi in &mut s.emis {
                    emi.emi_payments.retain(|p| p.id != payment_id);
                }
            },
            self.remote().delete_emi_payment(payment_id),
        )
        .await
    }
}
