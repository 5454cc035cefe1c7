//! Storage initialization
//!
//! First-run setup: writes the ledger and seeds the default categories.

use crate::config::settings::Settings;
use crate::error::BudgetError;
use crate::models::DEFAULT_CATEGORIES;

use super::record_store::RecordStore;
use super::Storage;

/// Initialize storage for a fresh installation
///
/// Seeds the default categories (unless disabled in settings), skipping any
/// whose name already exists, and makes sure `ledger.json` is on disk.
/// Returns the number of categories created.
pub async fn initialize_storage(
    storage: &Storage,
    settings: &Settings,
) -> Result<usize, BudgetError> {
    let mut created = 0;

    if settings.seed_default_categories {
        for name in DEFAULT_CATEGORIES {
            if storage.categories.get_by_name(name)?.is_some() {
                continue;
            }
            storage.add_category(name).await?;
            created += 1;
        }
    }

    if !storage.is_initialized() {
        storage.save_all().await?;
    }

    tracing::debug!(created, "storage initialized");
    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(storage: &Storage) -> bool {
    !storage.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use tempfile::TempDir;

    async fn open_temp() -> (Storage, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        (Storage::open(paths).await.unwrap(), temp_dir)
    }

    #[tokio::test]
    async fn test_initialize_storage() {
        let (storage, _temp) = open_temp().await;
        assert!(needs_initialization(&storage));

        let created = initialize_storage(&storage, &Settings::default())
            .await
            .unwrap();

        assert_eq!(created, DEFAULT_CATEGORIES.len());
        assert!(!needs_initialization(&storage));

        let names: Vec<_> = storage
            .get_all_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec!["Food", "Transport", "Leisure", "Utilities", "Health", "Education", "Other"]
        );
    }

    #[tokio::test]
    async fn test_seeding_skips_existing_names() {
        let (storage, _temp) = open_temp().await;
        storage.add_category("FOOD").await.unwrap();

        let created = initialize_storage(&storage, &Settings::default())
            .await
            .unwrap();
        assert_eq!(created, DEFAULT_CATEGORIES.len() - 1);

        // Running again adds nothing
        let again = initialize_storage(&storage, &Settings::default())
            .await
            .unwrap();
        assert_eq!(again, 0);
        assert_eq!(
            storage.categories.count().unwrap(),
            DEFAULT_CATEGORIES.len()
        );
    }

    #[tokio::test]
    async fn test_seeding_can_be_disabled() {
        let (storage, _temp) = open_temp().await;
        let settings = Settings {
            seed_default_categories: false,
            ..Settings::default()
        };

        let created = initialize_storage(&storage, &settings).await.unwrap();
        assert_eq!(created, 0);
        assert!(storage.is_initialized());
        assert_eq!(storage.categories.count().unwrap(), 0);
    }
}
