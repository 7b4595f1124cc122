//! Job token scope reconciliation for a single project.

use serde::Serialize;
use tracing::{debug, info};

use super::allowlist::{AllowlistChanges, reconcile_allowlist};
use crate::Result;
use crate::api::GitLabApi;
use crate::config::{EntityReference, ProjectConfig};
use crate::model::{AllowlistKind, EntityKind};
use crate::resolve::ReferenceCache;
use crate::scope::ScopeSettings;

/// What a reconciliation changed on one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub project_id: u64,
    pub previously_enabled: bool,
    pub limit_access_to_this_project: bool,
    pub projects: AllowlistChanges,
    pub groups: AllowlistChanges,
}

impl ReconcileReport {
    pub fn flag_changed(&self) -> bool {
        self.previously_enabled != self.limit_access_to_this_project
    }

    pub fn is_noop(&self) -> bool {
        !self.flag_changed() && self.projects.is_empty() && self.groups.is_empty()
    }
}

/// Converges a project's job token scope towards its configuration.
pub struct JobTokenScopeReconciler<'a> {
    api: &'a dyn GitLabApi,
}

impl<'a> JobTokenScopeReconciler<'a> {
    pub fn new(api: &'a dyn GitLabApi) -> Self {
        Self { api }
    }

    /// Reconcile the scope of `target` with the `job_token_scope` section of
    /// `config`. A missing section means "restrict access, empty allowlists".
    ///
    /// Each phase persists on its own, so an error part way leaves the earlier
    /// phases applied.
    ///
    /// # Errors
    ///
    /// Fails on the first unknown project/group reference or failed API call.
    pub async fn reconcile(
        &self,
        target: &EntityReference,
        config: &ProjectConfig,
    ) -> Result<ReconcileReport> {
        let scope_config = config.job_token_scope_or_default();
        debug!(project = %target, config = ?scope_config, "Job token scope config");

        let mut references = ReferenceCache::new();
        let project_id = references
            .resolve(self.api, EntityKind::Project, target)
            .await?;

        let mut scope = ScopeSettings::fetch(self.api, project_id).await?;
        let previously_enabled = scope.enabled();

        let limit_access = scope_config.limit_access_to_this_project;
        debug!(project_id, limit_access, "limit_access_to_this_project");
        scope.set_enabled(limit_access);
        scope.save().await?;
        scope.refresh().await?;

        let project_ids = references
            .resolve_all(
                self.api,
                EntityKind::Project,
                scope_config.allowed_projects(),
            )
            .await?;
        let projects = reconcile_allowlist(
            &mut scope,
            AllowlistKind::Projects,
            &project_ids,
            |id| id == project_id,
        )
        .await?;
        scope.refresh().await?;

        let group_ids = references
            .resolve_all(self.api, EntityKind::Group, scope_config.allowed_groups())
            .await?;
        let groups =
            reconcile_allowlist(&mut scope, AllowlistKind::Groups, &group_ids, |_| false).await?;
        scope.refresh().await?;

        info!(
            project_id,
            limit_access,
            projects_added = projects.added.len(),
            projects_removed = projects.removed.len(),
            groups_added = groups.added.len(),
            groups_removed = groups.removed.len(),
            "Job token scope reconciled"
        );

        Ok(ReconcileReport {
            project_id,
            previously_enabled,
            limit_access_to_this_project: limit_access,
            projects,
            groups,
        })
    }
}
