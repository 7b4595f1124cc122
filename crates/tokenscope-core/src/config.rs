//! Desired-state configuration for a project's job token scope.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference to a project or group: numeric id or full path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityReference {
    Id(u64),
    Path(String),
}

impl EntityReference {
    /// Form accepted by the API in place of an id.
    pub fn as_api_reference(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

impl From<u64> for EntityReference {
    fn from(id: u64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for EntityReference {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

/// Per-project configuration. Sections handled by other tools are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub job_token_scope: Option<JobTokenScopeConfig>,
}

impl ProjectConfig {
    /// The job token scope section, or its defaults when absent.
    pub fn job_token_scope_or_default(&self) -> JobTokenScopeConfig {
        self.job_token_scope.clone().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JobTokenScopeConfig {
    #[serde(default = "default_limit_access")]
    pub limit_access_to_this_project: bool,
    #[serde(default)]
    pub allowlist: Option<AllowlistConfig>,
}

fn default_limit_access() -> bool {
    true
}

impl Default for JobTokenScopeConfig {
    fn default() -> Self {
        Self {
            limit_access_to_this_project: default_limit_access(),
            allowlist: None,
        }
    }
}

impl JobTokenScopeConfig {
    pub fn allowed_projects(&self) -> &[EntityReference] {
        self.allowlist
            .as_ref()
            .and_then(|a| a.projects.as_deref())
            .unwrap_or_default()
    }

    pub fn allowed_groups(&self) -> &[EntityReference] {
        self.allowlist
            .as_ref()
            .and_then(|a| a.groups.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowlistConfig {
    #[serde(default)]
    pub projects: Option<Vec<EntityReference>>,
    #[serde(default)]
    pub groups: Option<Vec<EntityReference>>,
}
