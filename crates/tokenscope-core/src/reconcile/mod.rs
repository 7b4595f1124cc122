//! Reconciliation of job token scopes.
//!
//! - The restriction flag is written and saved unconditionally
//! - Project and group allowlists go through the same add-then-remove routine
//! - The project's own id is never added to or removed from its allowlist

mod allowlist;
mod job_token_scope;

pub use allowlist::{AllowlistChanges, ids_to_add, ids_to_remove, reconcile_allowlist};
pub use job_token_scope::{JobTokenScopeReconciler, ReconcileReport};
