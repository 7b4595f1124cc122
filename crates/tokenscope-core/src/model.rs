//! Remote object shapes returned by the GitLab API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A project as returned by `GET /projects/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub path_with_namespace: String,
}

/// A group as returned by `GET /groups/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    #[serde(default)]
    pub full_path: String,
}

/// Job token scope settings of a project.
///
/// GitLab reports the "limit access to this project" flag as
/// `inbound_enabled` on reads, while writes take `enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScopeState {
    pub inbound_enabled: bool,
    #[serde(default)]
    pub outbound_enabled: bool,
}

/// One entry of a project or group allowlist. Only the id matters here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowlistEntry {
    pub id: u64,
    #[serde(default, alias = "full_path", skip_serializing_if = "Option::is_none")]
    pub path_with_namespace: Option<String>,
}

impl AllowlistEntry {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            path_with_namespace: None,
        }
    }
}

/// Kind of entity a configured reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Group,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Project => f.write_str("project"),
            Self::Group => f.write_str("group"),
        }
    }
}

/// The two inbound allowlists of a job token scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AllowlistKind {
    Projects,
    Groups,
}

impl AllowlistKind {
    /// Path segment below `/projects/:id/job_token_scope/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Projects => "allowlist",
            Self::Groups => "groups_allowlist",
        }
    }

    /// Body key used when adding an entry.
    pub fn target_key(self) -> &'static str {
        match self {
            Self::Projects => "target_project_id",
            Self::Groups => "target_group_id",
        }
    }
}

impl fmt::Display for AllowlistKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Projects => f.write_str("projects"),
            Self::Groups => f.write_str("groups"),
        }
    }
}
