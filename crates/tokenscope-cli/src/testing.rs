//! In-memory GitLab used by the command tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokenscope_core::{
    AllowlistEntry, AllowlistKind, EntityKind, Error, GitLabApi, Group, Project, Result,
    ScopeState,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    UpdateScope(u64, bool),
    Add(u64, AllowlistKind, u64),
    Remove(u64, AllowlistKind, u64),
}

#[derive(Default)]
struct State {
    projects: Vec<Project>,
    enabled: HashMap<u64, bool>,
    allowlists: HashMap<(u64, AllowlistKind), Vec<u64>>,
    mutations: Vec<Mutation>,
}

/// Projects start unrestricted with only themselves on the allowlist.
/// Unknown references fail to resolve.
#[derive(Default)]
pub struct FakeGitLab {
    state: Mutex<State>,
}

impl FakeGitLab {
    pub fn with_projects(projects: &[(u64, &str)]) -> Self {
        let fake = Self::default();
        {
            let mut state = fake.state.lock().unwrap();
            for (id, path) in projects {
                state.projects.push(Project {
                    id: *id,
                    path_with_namespace: path.to_string(),
                });
                state.enabled.insert(*id, false);
                state.allowlists.insert((*id, AllowlistKind::Projects), vec![*id]);
                state.allowlists.insert((*id, AllowlistKind::Groups), Vec::new());
            }
        }
        fake
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().unwrap().mutations.clone()
    }

    pub fn enabled(&self, project_id: u64) -> bool {
        self.state.lock().unwrap().enabled[&project_id]
    }
}

#[async_trait]
impl GitLabApi for FakeGitLab {
    async fn get_project(&self, reference: &str) -> Result<Project> {
        let state = self.state.lock().unwrap();
        state
            .projects
            .iter()
            .find(|p| p.path_with_namespace == reference || p.id.to_string() == reference)
            .cloned()
            .ok_or_else(|| Error::resolution(EntityKind::Project, reference))
    }

    async fn get_group(&self, reference: &str) -> Result<Group> {
        Err(Error::resolution(EntityKind::Group, reference))
    }

    async fn get_job_token_scope(&self, project_id: u64) -> Result<ScopeState> {
        let state = self.state.lock().unwrap();
        Ok(ScopeState {
            inbound_enabled: state.enabled[&project_id],
            outbound_enabled: false,
        })
    }

    async fn update_job_token_scope(&self, project_id: u64, enabled: bool) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations.push(Mutation::UpdateScope(project_id, enabled));
        state.enabled.insert(project_id, enabled);
        Ok(())
    }

    async fn list_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
    ) -> Result<Vec<AllowlistEntry>> {
        let state = self.state.lock().unwrap();
        Ok(state.allowlists[&(project_id, kind)]
            .iter()
            .copied()
            .map(AllowlistEntry::new)
            .collect())
    }

    async fn add_to_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations.push(Mutation::Add(project_id, kind, target_id));
        if let Some(list) = state.allowlists.get_mut(&(project_id, kind)) {
            list.push(target_id);
        }
        Ok(())
    }

    async fn remove_from_allowlist(
        &self,
        project_id: u64,
        kind: AllowlistKind,
        target_id: u64,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.mutations.push(Mutation::Remove(project_id, kind, target_id));
        if let Some(list) = state.allowlists.get_mut(&(project_id, kind)) {
            list.retain(|id| *id != target_id);
        }
        Ok(())
    }
}
