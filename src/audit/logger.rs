//! Append-only JSONL audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::error::{BudgetError, BudgetResult};

use super::entry::AuditEntry;

/// Writes audit entries to the audit log file
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry
    pub async fn log(&self, entry: &AuditEntry) -> BudgetResult<()> {
        self.log_batch(std::slice::from_ref(entry)).await
    }

    /// Append several entries with a single flush
    pub async fn log_batch(&self, entries: &[AuditEntry]) -> BudgetResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut buffer = String::new();
        for entry in entries {
            let json = serde_json::to_string(entry)
                .map_err(|e| BudgetError::Json(format!("Failed to serialize audit entry: {}", e)))?;
            buffer.push_str(&json);
            buffer.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
            .map_err(|e| BudgetError::Io(format!("Failed to open audit log: {}", e)))?;

        file.write_all(buffer.as_bytes())
            .await
            .map_err(|e| BudgetError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .await
            .map_err(|e| BudgetError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all entries, oldest first
    pub async fn read_all(&self) -> BudgetResult<Vec<AuditEntry>> {
        let file = match File::open(&self.log_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(BudgetError::Io(format!("Failed to open audit log: {}", e))),
        };

        let mut lines = BufReader::new(file).lines();
        let mut entries = Vec::new();
        let mut line_num = 0usize;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| BudgetError::Io(format!("Failed to read audit log: {}", e)))?
        {
            line_num += 1;
            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                BudgetError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num, e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::{EntityType, Operation};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn category_entry(id: u64) -> AuditEntry {
        AuditEntry::create(
            EntityType::Category,
            format!("cat-{}", id),
            None,
            &json!({"id": id}),
        )
    }

    #[tokio::test]
    async fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&category_entry(1)).await.unwrap();

        let entries = logger.read_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Category);
    }

    #[tokio::test]
    async fn test_entries_are_appended_in_order() {
        let (logger, _temp) = create_test_logger();
        for i in 0..3 {
            logger.log(&category_entry(i)).await.unwrap();
        }
        logger
            .log_batch(&[category_entry(3), category_entry(4)])
            .await
            .unwrap();

        let ids: Vec<_> = logger
            .read_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.entity_id)
            .collect();
        assert_eq!(ids, vec!["cat-0", "cat-1", "cat-2", "cat-3", "cat-4"]);
    }

    #[tokio::test]
    async fn test_missing_log_reads_empty() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().await.unwrap().is_empty());
        assert!(!logger.path().exists());
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let (logger, temp) = create_test_logger();
        logger.log(&category_entry(1)).await.unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().await.unwrap().len(), 1);
    }
}
