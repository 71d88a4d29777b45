use super::{labelled, Feature};
use crate::optimistic::{confirmed_mutate, optimistic_mutate};
use crate::page::PageSync;
use async_trait::async_trait;
use fintra_client::RemoteDataService;
use fintra_core::{
    FintraResult, Member, MemberRole, SyncError, UserId, ValidationError, Workspace,
};
use serde::{Deserialize, Serialize};

/// People with access to an organization workspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Members;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MembersSnapshot {
    pub members: Vec<Member>,
}

#[async_trait]
impl Feature for Members {
    type Snapshot = MembersSnapshot;
    const KEY: &'static str = "fintra_members_data";
    const NAME: &'static str = "Members";

    /// Personal workspaces have no member list; no call is made.
    async fn fetch(
        &self,
        remote: &dyn RemoteDataService,
        workspace: &Workspace,
    ) -> FintraResult<MembersSnapshot> {
        if !workspace.is_organization() {
            return Ok(MembersSnapshot::default());
        }
        let members = labelled("Members", remote.get_workspace_members(workspace.id)).await?;
        Ok(MembersSnapshot { members })
    }
}

impl PageSync<Members> {
    fn require_organization(&self) -> FintraResult<()> {
        let workspace = self.workspace();
        if workspace.is_organization() {
            Ok(())
        } else {
            Err(SyncError::RequiresOrganization {
                workspace_id: workspace.id,
            }
            .into())
        }
    }

    /// Invite an existing user by email.
    pub async fn add_member(&self, email: &str, role: MemberRole) -> FintraResult<()> {
        self.require_organization()?;
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::RequiredFieldMissing {
                field: "email".to_string(),
            }
            .into());
        }
        if !email.contains('@') {
            return Err(ValidationError::InvalidValue {
                field: "email".to_string(),
                reason: "not an email address".to_string(),
            }
            .into());
        }
        let workspace_id = self.workspace().id;
        confirmed_mutate(self, self.remote().add_member(workspace_id, email, role)).await
    }

    pub async fn update_member_role(&self, user_id: UserId, role: MemberRole) -> FintraResult<()> {
        self.require_organization()?;
        let workspace_id = self.workspace().id;
        optimistic_mutate(
            self,
            |s| {
                if let Some(member) = s.members.iter_mut().find(|m| m.id == user_id) {
                    member.role = role;
                }
            },
            self.remote().update_member_role(workspace_id, user_id, role),
        )
        .await
    }

    pub async fn remove_member(&self, user_id: UserId) -> FintraResult<()> {
        self.require_organization()?;
        let workspace_id = self.workspace().id;
        optimistic_mutate(
            self,
            |s| s.members.retain(|m| m.id != user_id),
            self.remote().remove_member(workspace_id, user_id),
        )
        .await
    }
}
