//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::engine::EngineOutput;
use crate::vault::{HealthReport, VaultConfig};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print whatever restic wrote, as-is.
pub fn engine_output(output: &EngineOutput) {
    let text = output.output.trim_end();
    if !text.is_empty() {
        println!("{text}");
    }
}

/// Print a table of registered repositories (Name, Paths, Keep).
pub fn print_repositories_table(config: &VaultConfig) {
    if config.repositories.is_empty() {
        info("No repositories in this vault yet.");
        tip("Run `resteasy repo add <NAME> <PATH>...` to add your first repository.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Paths", "Keep"]);

    for (name, repo) in &config.repositories {
        let paths = repo
            .backup_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        let keep = match repo.max_snapshots {
            Some(n) => n.to_string(),
            None => format!("{} (default)", config.max_snapshots),
        };
        table.add_row(vec![name.clone(), paths, keep]);
    }

    println!("{table}");
}

/// Print the outcome of a health check.
pub fn print_health_report(report: &HealthReport) {
    if report.is_healthy() {
        success(&format!(
            "Vault is healthy ({} repositories checked)",
            report.checked
        ));
        return;
    }

    for issue in &report.issues {
        warning(&issue.to_string());
    }
}
