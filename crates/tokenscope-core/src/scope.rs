//! Handle over a project's remote job token scope.

use tracing::debug;

use crate::Result;
use crate::api::GitLabApi;
use crate::model::{AllowlistEntry, AllowlistKind, ScopeState};

/// Client-side view of one project's job token scope.
///
/// Changes to the flag are staged with [`ScopeSettings::set_enabled`] and sent
/// by [`ScopeSettings::save`]. A save with nothing staged issues no request.
pub struct ScopeSettings<'a> {
    api: &'a dyn GitLabApi,
    project_id: u64,
    state: ScopeState,
    pending_enabled: Option<bool>,
}

impl<'a> ScopeSettings<'a> {
    pub async fn fetch(api: &'a dyn GitLabApi, project_id: u64) -> Result<Self> {
        let state = api.get_job_token_scope(project_id).await?;
        Ok(Self {
            api,
            project_id,
            state,
            pending_enabled: None,
        })
    }

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    /// Current flag value, including a staged change.
    pub fn enabled(&self) -> bool {
        self.pending_enabled.unwrap_or(self.state.inbound_enabled)
    }

    /// Stage the flag. It is sent on the next save even if it equals the
    /// fetched value.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.pending_enabled = Some(enabled);
    }

    pub async fn save(&mut self) -> Result<()> {
        let Some(enabled) = self.pending_enabled.take() else {
            return Ok(());
        };
        self.api
            .update_job_token_scope(self.project_id, enabled)
            .await?;
        self.state.inbound_enabled = enabled;
        debug!(project_id = self.project_id, enabled, "Saved job token scope");
        Ok(())
    }

    /// Re-read remote state. Unsaved changes are discarded.
    pub async fn refresh(&mut self) -> Result<()> {
        self.state = self.api.get_job_token_scope(self.project_id).await?;
        self.pending_enabled = None;
        Ok(())
    }

    pub fn allowlist(&self, kind: AllowlistKind) -> Allowlist<'a> {
        Allowlist {
            api: self.api,
            project_id: self.project_id,
            kind,
        }
    }
}

/// One of the two allowlists attached to a scope.
#[derive(Clone, Copy)]
pub struct Allowlist<'a> {
    api: &'a dyn GitLabApi,
    project_id: u64,
    kind: AllowlistKind,
}

impl Allowlist<'_> {
    pub async fn list(&self) -> Result<Vec<AllowlistEntry>> {
        self.api.list_allowlist(self.project_id, self.kind).await
    }

    pub async fn create(&self, target_id: u64) -> Result<()> {
        self.api
            .add_to_allowlist(self.project_id, self.kind, target_id)
            .await
    }

    pub async fn delete(&self, target_id: u64) -> Result<()> {
        self.api
            .remove_from_allowlist(self.project_id, self.kind, target_id)
            .await
    }
}
