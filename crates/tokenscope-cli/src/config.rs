use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use tokenscope_core::{EntityReference, ProjectConfig};
use tokenscope_gitlab::ClientConfig;
use tracing::{debug, warn};

#[derive(Debug, Deserialize, Default)]
pub struct GitLabSection {
    pub url: Option<String>,
    pub token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ToolConfig {
    #[serde(default)]
    pub gitlab: GitLabSection,
    #[serde(default)]
    pub projects_and_groups: IndexMap<String, ProjectConfig>,
}

pub fn load(path: &Path) -> Result<ToolConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

/// Like [`load`], but a missing file yields an empty configuration.
pub fn load_or_default(path: &Path) -> Result<ToolConfig> {
    if !path.exists() {
        debug!("Config file does not exist: {:?}", path);
        return Ok(ToolConfig::default());
    }
    load(path)
}

pub fn parse(content: &str) -> Result<ToolConfig> {
    // An empty document deserializes to null
    if content.trim().is_empty() {
        return Ok(ToolConfig::default());
    }
    Ok(serde_yaml::from_str(content)?)
}

pub fn resolve_connection(
    cli_url: &Option<String>,
    cli_token: &Option<String>,
    cfg: &GitLabSection,
) -> Result<ClientConfig> {
    // 1. --gitlab-url / --token flags and GITLAB_URL / GITLAB_TOKEN env
    // 2. gitlab section of the config file
    let url = cli_url.clone().or_else(|| cfg.url.clone()).context(
        "No GitLab URL configured. Use --gitlab-url, set GITLAB_URL, or add gitlab.url to the config file",
    )?;
    let token = cli_token.clone().or_else(|| cfg.token.clone()).context(
        "No GitLab token configured. Use --token, set GITLAB_TOKEN, or add gitlab.token to the config file",
    )?;

    let mut client = ClientConfig::new(url, token);
    if let Some(secs) = cfg.timeout_secs {
        client = client.with_request_timeout(Duration::from_secs(secs));
    }
    Ok(client)
}

/// Project key from the config file as an API reference.
pub fn project_reference(key: &str) -> EntityReference {
    match key.parse::<u64>() {
        Ok(id) => EntityReference::Id(id),
        Err(_) => EntityReference::Path(key.to_string()),
    }
}

/// Entries to reconcile, in file order.
///
/// Wildcard keys and entries without a `job_token_scope` section are skipped.
/// Every name in `only` must be a key of the file.
pub fn select_targets<'c>(
    cfg: &'c ToolConfig,
    only: &[String],
) -> Result<Vec<(&'c str, &'c ProjectConfig)>> {
    for name in only {
        if !cfg.projects_and_groups.contains_key(name) {
            anyhow::bail!("Project {name} is not in the configuration");
        }
    }

    let mut targets = Vec::new();
    for (key, project) in &cfg.projects_and_groups {
        if !only.is_empty() && !only.contains(key) {
            continue;
        }
        if key.contains('*') {
            warn!("Skipping {key}: group wildcards are not supported");
            continue;
        }
        if project.job_token_scope.is_none() {
            debug!("Skipping {key}: no job_token_scope section");
            continue;
        }
        targets.push((key.as_str(), project));
    }
    Ok(targets)
}
