//! `resteasy audit`: display the audit log.
//!
//! Usage:
//!   resteasy audit               # show last 50 entries
//!   resteasy audit --last 20     # show last 20

use crate::cli::{open_vault, Cli};
use crate::errors::{ResteasyError, Result};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::output;

    // Only read the log of a real vault; never create audit.db elsewhere.
    let vault = open_vault(cli)?;

    let audit = AuditLog::open(vault.root_dir())
        .ok_or_else(|| ResteasyError::AuditError("failed to open audit database".into()))?;

    let entries = audit.query(last)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Execute the `audit` command.
#[cfg(not(feature = "audit-log"))]
pub fn execute(cli: &Cli, last: usize) -> Result<()> {
    let _ = (open_vault(cli)?, last);
    Err(ResteasyError::AuditError(
        "audit log support is not compiled in (enable the `audit-log` feature)".into(),
    ))
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Repository", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.operation.clone(),
            entry.repository.clone().unwrap_or_else(|| "-".into()),
            entry.details.clone().unwrap_or_default(),
        ]);
    }

    println!("{table}");
}
