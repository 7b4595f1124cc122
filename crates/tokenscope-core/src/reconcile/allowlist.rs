//! Set reconciliation shared by the project and group allowlists.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::Result;
use crate::model::{AllowlistEntry, AllowlistKind};
use crate::scope::ScopeSettings;

/// Ids added to and removed from one allowlist.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AllowlistChanges {
    pub added: Vec<u64>,
    pub removed: Vec<u64>,
}

impl AllowlistChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Desired ids missing from `existing`, in configured order without repeats.
pub fn ids_to_add(existing: &[AllowlistEntry], desired: &[u64]) -> Vec<u64> {
    let present: HashSet<u64> = existing.iter().map(|e| e.id).collect();
    let mut seen = HashSet::new();
    desired
        .iter()
        .copied()
        .filter(|id| !present.contains(id) && seen.insert(*id))
        .collect()
}

/// Existing ids that are not desired, in listing order.
pub fn ids_to_remove(existing: &[AllowlistEntry], desired: &[u64]) -> Vec<u64> {
    let wanted: HashSet<u64> = desired.iter().copied().collect();
    existing
        .iter()
        .map(|e| e.id)
        .filter(|id| !wanted.contains(id))
        .collect()
}

/// Converge one allowlist of `scope` to `desired`.
///
/// Additions run before removals and every mutation is followed by a save of
/// the scope. Ids for which `protected` returns true are never added or
/// removed. An empty `desired` clears the list (apart from protected ids).
pub async fn reconcile_allowlist(
    scope: &mut ScopeSettings<'_>,
    kind: AllowlistKind,
    desired: &[u64],
    protected: impl Fn(u64) -> bool + Send,
) -> Result<AllowlistChanges> {
    let project_id = scope.project_id();
    if desired.is_empty() {
        warn!(
            project_id,
            %kind,
            "Process will remove existing {kind} from allowlist, as none set in configuration"
        );
    }

    let allowlist = scope.allowlist(kind);
    let existing = allowlist.list().await?;
    let mut changes = AllowlistChanges::default();

    for target_id in ids_to_add(&existing, desired) {
        if protected(target_id) {
            continue;
        }
        allowlist.create(target_id).await?;
        info!(project_id, %kind, target_id, "Added to allowlist");
        scope.save().await?;
        changes.added.push(target_id);
    }

    for target_id in ids_to_remove(&existing, desired) {
        if protected(target_id) {
            continue;
        }
        allowlist.delete(target_id).await?;
        info!(project_id, %kind, target_id, "Deleted from allowlist");
        scope.save().await?;
        changes.removed.push(target_id);
    }

    Ok(changes)
}
