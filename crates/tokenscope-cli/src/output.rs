use crate::cli::OutputFormat;
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tokenscope_core::{AllowlistChanges, ReconcileReport};

pub fn print_value<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json | OutputFormat::Table => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(value)?);
        }
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// One line per project: flag transition and allowlist deltas.
pub fn print_summary(reports: &[(String, ReconcileReport)]) {
    if reports.is_empty() {
        println!("No projects with a job_token_scope section.");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["Project", "ID", "Limit access", "Projects", "Groups"]);
    for (name, report) in reports {
        let flag = if report.flag_changed() {
            format!(
                "{} -> {}",
                report.previously_enabled, report.limit_access_to_this_project
            )
        } else {
            report.limit_access_to_this_project.to_string()
        };
        builder.push_record([
            name.clone(),
            report.project_id.to_string(),
            flag,
            format_changes(&report.projects),
            format_changes(&report.groups),
        ]);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}

fn format_changes(changes: &AllowlistChanges) -> String {
    if changes.is_empty() {
        return "-".to_string();
    }
    let mut parts: Vec<String> = changes.added.iter().map(|id| format!("+{id}")).collect();
    parts.extend(changes.removed.iter().map(|id| format!("-{id}")));
    parts.join(" ")
}
