//! Test harness for integration tests.
//!
//! Provides utilities for creating throwaway databases and ledger managers
//! backed by temporary directories.

use ledger_state::LedgerManager;
use ledger_storage::Database;
use std::sync::Arc;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop.
pub struct TestDatabase {
    db: Database,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new test database in a temporary directory, with the schema
    /// bootstrapped.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db = Database::open(temp_dir.path()).expect("Failed to open database");
        db.ensure_schema().expect("Failed to bootstrap schema");
        Self {
            db,
            _temp_dir: temp_dir,
        }
    }

    /// Get a clone of the database (shares the underlying connection).
    pub fn db_clone(&self) -> Database {
        self.db.clone()
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Deref for TestDatabase {
    type Target = Database;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}

/// Create a ledger manager over a fresh temporary database.
///
/// The returned [`TestDatabase`] keeps the temp directory alive and gives
/// tests direct store access alongside the manager.
pub fn test_manager() -> (LedgerManager, TestDatabase) {
    let test_db = TestDatabase::new();
    let manager = LedgerManager::new(Arc::new(test_db.db_clone()));
    (manager, test_db)
}
