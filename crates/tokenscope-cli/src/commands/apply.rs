use anyhow::{Context, Result};
use colored::Colorize;
use tokenscope_core::{GitLabApi, JobTokenScopeReconciler, ReconcileReport};

use crate::cli::{ApplyArgs, OutputFormat};
use crate::config::{self, ToolConfig};
use crate::output::{print_error, print_success, print_summary, print_value};

pub async fn apply(
    api: &dyn GitLabApi,
    cfg: &ToolConfig,
    args: &ApplyArgs,
    format: OutputFormat,
) -> Result<()> {
    let targets = config::select_targets(cfg, &args.projects)?;
    let reconciler = JobTokenScopeReconciler::new(api);

    let mut reports: Vec<(String, ReconcileReport)> = Vec::new();
    let mut failures = 0usize;

    for (key, project_cfg) in targets {
        let reference = config::project_reference(key);
        match reconciler.reconcile(&reference, project_cfg).await {
            Ok(report) => {
                let verb = if args.dry_run { "Would reconcile" } else { "Reconciled" };
                print_success(&format!("{verb} {}", key.cyan()));
                reports.push((key.to_string(), report));
            }
            Err(e) if args.continue_on_error => {
                print_error(&format!("{}: {e}", key.cyan()));
                failures += 1;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to reconcile {key}"));
            }
        }
    }

    match format {
        OutputFormat::Table => print_summary(&reports),
        OutputFormat::Json | OutputFormat::Yaml => {
            let by_project: Vec<serde_json::Value> = reports
                .iter()
                .map(|(key, report)| {
                    serde_json::json!({
                        "project": key,
                        "report": report,
                    })
                })
                .collect();
            print_value(&by_project, format)?;
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} project(s) failed to reconcile");
    }
    Ok(())
}
