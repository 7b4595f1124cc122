//! Memoized resolution of configured references to numeric ids.

use std::collections::HashMap;

use tracing::debug;

use crate::Result;
use crate::api::GitLabApi;
use crate::config::EntityReference;
use crate::model::EntityKind;

/// Name-or-id to id lookups, valid for one reconciliation.
///
/// Numeric ids are looked up too, so a stale id fails the same way an unknown
/// path does. Once resolved, a reference keeps its id for the lifetime of the
/// cache.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    resolved: HashMap<(EntityKind, String), u64>,
}

impl ReferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn resolve(
        &mut self,
        api: &dyn GitLabApi,
        kind: EntityKind,
        reference: &EntityReference,
    ) -> Result<u64> {
        let key = (kind, reference.as_api_reference());
        if let Some(id) = self.resolved.get(&key) {
            return Ok(*id);
        }

        let id = match kind {
            EntityKind::Project => api.get_project(&key.1).await?.id,
            EntityKind::Group => api.get_group(&key.1).await?.id,
        };
        debug!(%kind, reference = %key.1, id, "Resolved reference");
        self.resolved.insert(key, id);
        Ok(id)
    }

    /// Resolve references in order. The first unknown reference aborts.
    pub async fn resolve_all(
        &mut self,
        api: &dyn GitLabApi,
        kind: EntityKind,
        references: &[EntityReference],
    ) -> Result<Vec<u64>> {
        let mut ids = Vec::with_capacity(references.len());
        for reference in references {
            ids.push(self.resolve(api, kind, reference).await?);
        }
        Ok(ids)
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
