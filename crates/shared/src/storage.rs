//! Durable key/value storage and the API credential store.
//!
//! `LocalStorage` is a flat string map persisted in the SQLite database; every
//! write is committed immediately. `CredentialStore` keeps the catalog API key
//! under a single fixed key.

use crate::Database;
use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use tracing::{debug, info};

/// Storage key holding the catalog API key
pub const CREDENTIAL_KEY: &str = "animeHubApiKey";

/// String key/value store backed by the `local_storage` table
pub struct LocalStorage {
    db: Database,
}

impl LocalStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Read a value, `None` if the key was never set or has been removed
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.db
            .conn()
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read storage key {}", key))
    }

    /// Insert or replace a value
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .conn()
            .execute(
                "INSERT INTO local_storage (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now()],
            )
            .with_context(|| format!("Failed to write storage key {}", key))?;

        debug!(key = key, "Storage item written");
        Ok(())
    }

    /// Remove a value; removing a missing key is not an error
    pub fn remove_item(&self, key: &str) -> Result<()> {
        let removed = self
            .db
            .conn()
            .execute("DELETE FROM local_storage WHERE key = ?1", params![key])
            .with_context(|| format!("Failed to remove storage key {}", key))?;

        debug!(key = key, removed = removed, "Storage item removed");
        Ok(())
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .db
            .conn()
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("Failed to list storage keys")?;
        Ok(keys)
    }
}

/// Persisted API key
///
/// No format validation happens here; callers decide what a usable key is.
pub struct CredentialStore {
    storage: LocalStorage,
}

impl CredentialStore {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Open the store on the database at `path`
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let db = Database::open(path).context("Failed to open credential storage")?;
        Ok(Self::new(LocalStorage::new(db)))
    }

    pub fn get(&self) -> Result<Option<String>> {
        self.storage.get_item(CREDENTIAL_KEY)
    }

    pub fn set(&self, value: &str) -> Result<()> {
        self.storage.set_item(CREDENTIAL_KEY, value)?;
        info!("API key saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove_item(CREDENTIAL_KEY)?;
        info!("API key cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get_item() -> Result<()> {
        let storage = LocalStorage::new(Database::open_in_memory()?);

        assert_eq!(storage.get_item("theme")?, None);
        storage.set_item("theme", "dark")?;
        assert_eq!(storage.get_item("theme")?.as_deref(), Some("dark"));

        // Overwrite replaces rather than duplicating
        storage.set_item("theme", "light")?;
        assert_eq!(storage.get_item("theme")?.as_deref(), Some("light"));
        assert_eq!(storage.keys()?, vec!["theme".to_string()]);

        Ok(())
    }

    #[test]
    fn test_remove_item() -> Result<()> {
        let storage = LocalStorage::new(Database::open_in_memory()?);

        storage.set_item("a", "1")?;
        storage.remove_item("a")?;
        storage.remove_item("never-set")?;
        assert_eq!(storage.get_item("a")?, None);
        assert!(storage.keys()?.is_empty());

        Ok(())
    }

    #[test]
    fn test_credential_survives_reopen() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("store.db");

        {
            let store = CredentialStore::open(&db_path)?;
            assert_eq!(store.get()?, None);
            store.set("secret-key")?;
        }

        let store = CredentialStore::open(&db_path)?;
        assert_eq!(store.get()?.as_deref(), Some("secret-key"));

        store.clear()?;
        assert_eq!(store.get()?, None);

        Ok(())
    }

    #[test]
    fn test_credential_not_validated() -> Result<()> {
        let store = CredentialStore::new(LocalStorage::new(Database::open_in_memory()?));
        store.set("  not a real key  ")?;
        assert_eq!(store.get()?.as_deref(), Some("  not a real key  "));
        Ok(())
    }
}
