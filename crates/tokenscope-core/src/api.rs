//! The slice of the GitLab API the reconciler consumes.

use async_trait::async_trait;
use tracing::info;

use crate::Result;
use crate::model::{AllowlistEntry, AllowlistKind, Group, Project, ScopeState};

/// Remote operations needed to read and converge a job token scope.
///
/// `reference` arguments are either a numeric id or a full path; the
/// implementation is responsible for encoding them. Project and group lookups
/// must fail with [`crate::Error::Resolution`] when the entity does not exist.
#[async_trait]
pub trait GitLabApi: Send + Sync {
    async fn get_project(&self, reference: &str) -> Result<Project>;

    async fn get_group(&self, reference: &str) -> Result<Group>;

    async fn get_job_token_scope(&self, project_id: u64) -> Result<ScopeState>;

    /// Persist the "limit access to this project" flag.
    async fn update_job_token_scope(&self, project_id: u64, enabled: bool) -> Result<()>;

    /// List every entry of an allowlist, following pagination.
    async fn list_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
    ) -> Result<Vec<AllowlistEntry>>;

    async fn add_to_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()>;

    async fn remove_from_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()>;
}

/// Decorator that performs reads but only logs mutations.
pub struct DryRun<A> {
    inner: A,
}

impl<A: GitLabApi> DryRun<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

#[async_trait]
impl<A: GitLabApi> GitLabApi for DryRun<A> {
    async fn get_project(&self, reference: &str) -> Result<Project> {
        self.inner.get_project(reference).await
    }

    async fn get_group(&self, reference: &str) -> Result<Group> {
        self.inner.get_group(reference).await
    }

    async fn get_job_token_scope(&self, project_id: u64) -> Result<ScopeState> {
        self.inner.get_job_token_scope(project_id).await
    }

    async fn update_job_token_scope(&self, project_id: u64, enabled: bool) -> Result<()> {
        info!(project_id, enabled, "[dry-run] would update job token scope");
        Ok(())
    }

    async fn list_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
    ) -> Result<Vec<AllowlistEntry>> {
        self.inner.list_allowlist(project_id, kind).await
    }

    async fn add_to_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()> {
        info!(project_id, %kind, target_id, "[dry-run] would add to allowlist");
        Ok(())
    }

    async fn remove_from_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()> {
        info!(project_id, %kind, target_id, "[dry-run] would remove from allowlist");
        Ok(())
    }
}
