//! Job token scope reconciliation for GitLab projects
//!
//! This crate converges the CI/CD job token scope of a project towards a
//! declared configuration:
//! - The "limit access to this project" flag
//! - The inbound project allowlist (the project itself always stays on it)
//! - The inbound group allowlist
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 JobTokenScopeReconciler                   │
//! │  ┌────────────────┐  ┌──────────────┐  ┌──────────────┐  │
//! │  │ ReferenceCache │  │ ScopeSettings│  │ reconcile_   │  │
//! │  │ (path -> id)   │  │ (flag, save) │  │ allowlist    │  │
//! │  └───────┬────────┘  └──────┬───────┘  └──────┬───────┘  │
//! │          └──────────────────┴─────────────────┘          │
//! │                             │                            │
//! │                       dyn GitLabApi                       │
//! └─────────────────────────────┬────────────────────────────┘
//!                               │
//!              ┌────────────────┴────────────────┐
//!              ▼                                 ▼
//!        HTTP client                       DryRun / fakes
//! ```

pub mod api;
pub mod config;
pub mod model;
pub mod reconcile;
pub mod resolve;
pub mod scope;

// Re-export main types
pub use api::{DryRun, GitLabApi};
pub use config::{AllowlistConfig, EntityReference, JobTokenScopeConfig, ProjectConfig};
pub use model::{AllowlistEntry, AllowlistKind, EntityKind, Group, Project, ScopeState};
pub use reconcile::{AllowlistChanges, JobTokenScopeReconciler, ReconcileReport};
pub use resolve::ReferenceCache;
pub use scope::ScopeSettings;

/// Error types for reconciliation operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} not found: {reference}")]
    Resolution { kind: EntityKind, reference: String },

    #[error("GitLab API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn resolution(kind: EntityKind, reference: impl Into<String>) -> Self {
        Self::Resolution {
            kind,
            reference: reference.into(),
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error means a configured reference does not exist.
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }
}

/// Result type for reconciliation operations
pub type Result<T> = std::result::Result<T, Error>;
