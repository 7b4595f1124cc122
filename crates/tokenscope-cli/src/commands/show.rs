use anyhow::Result;
use colored::Colorize;
use serde_json::json;
use tokenscope_core::{AllowlistEntry, AllowlistKind, GitLabApi, ScopeSettings};

use crate::cli::OutputFormat;
use crate::config;
use crate::output::print_value;

pub async fn show(api: &dyn GitLabApi, project: &str, format: OutputFormat) -> Result<()> {
    let reference = config::project_reference(project);
    let project = api.get_project(&reference.as_api_reference()).await?;
    let scope = ScopeSettings::fetch(api, project.id).await?;
    let projects = scope.allowlist(AllowlistKind::Projects).list().await?;
    let groups = scope.allowlist(AllowlistKind::Groups).list().await?;

    if matches!(format, OutputFormat::Table) {
        println!(
            "{}: {} ({})",
            "Project".cyan(),
            project.path_with_namespace,
            project.id
        );
        println!(
            "{}: {}",
            "Limit access to this project".cyan(),
            scope.enabled()
        );
        print_entries("Allowed projects", &projects);
        print_entries("Allowed groups", &groups);
    } else {
        let value = json!({
            "project": project,
            "limit_access_to_this_project": scope.enabled(),
            "allowlist": {
                "projects": projects,
                "groups": groups,
            },
        });
        print_value(&value, format)?;
    }
    Ok(())
}

fn print_entries(label: &str, entries: &[AllowlistEntry]) {
    println!("{}: {}", label.cyan(), entries.len());
    for entry in entries {
        match &entry.path_with_namespace {
            Some(path) => println!("  {} ({})", path, entry.id),
            None => println!("  {}", entry.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokenscope_core::Error;

    use super::*;
    use crate::testing::FakeGitLab;

    #[tokio::test]
    async fn test_show_known_project_by_path_and_id() {
        let api = FakeGitLab::with_projects(&[(1, "acme/app")]);

        show(&api, "acme/app", OutputFormat::Json).await.unwrap();
        show(&api, "1", OutputFormat::Table).await.unwrap();

        assert!(api.mutations().is_empty());
    }

    #[tokio::test]
    async fn test_show_unknown_project_fails_to_resolve() {
        let api = FakeGitLab::with_projects(&[(1, "acme/app")]);

        let err = show(&api, "acme/missing", OutputFormat::Json)
            .await
            .unwrap_err();

        let err = err.downcast_ref::<Error>().unwrap();
        assert!(err.is_resolution());
    }
}
