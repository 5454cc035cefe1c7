//! Audit log CLI command

use super::print_json;
use crate::audit::AuditEntry;
use crate::error::BudgetResult;
use crate::storage::Storage;

/// The last `limit` entries, oldest first
pub async fn recent_audit_entries(
    storage: &Storage,
    limit: usize,
) -> BudgetResult<Vec<AuditEntry>> {
    let mut entries = storage.audit_log().read_all().await?;
    let skip = entries.len().saturating_sub(limit);
    Ok(entries.split_off(skip))
}

pub fn format_audit_entries(entries: &[AuditEntry]) -> String {
    if entries.is_empty() {
        return "Audit log is empty.\n".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        output.push_str(&entry.format_human_readable());
        output.push('\n');
    }
    output
}

/// Handle the audit command
pub async fn handle_audit_command(
    storage: &Storage,
    limit: usize,
    json: bool,
) -> BudgetResult<()> {
    let entries = recent_audit_entries(storage, limit).await?;

    if json {
        print_json(&entries)?;
    } else {
        print!("{}", format_audit_entries(&entries));
    }

    Ok(())
}
