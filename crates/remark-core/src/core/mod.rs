//! Service layer for remark-core.
//!
//! Provides typed, high-level APIs for thread and comment operations on top
//! of any [`Store`]. The services borrow the store; they hold no state of
//! their own.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use remark_core::core::RemarkContext;
//!
//! let ctx = RemarkContext::new(Path::new(".remark/comments.db"));
//! let services = ctx.services().unwrap();
//!
//! let thread = services.threads().find_thread("blog/hello-world").unwrap();
//! let tree = services.comments().find_comments_by_thread(&thread).unwrap();
//! ```

#![allow(clippy::missing_errors_doc)]

pub mod comments;
pub mod errors;
pub mod threads;

pub use errors::{CoreError, CoreResult};

use std::path::{Path, PathBuf};

use crate::store::{SqliteStore, Store};

/// Context for remark-core services.
///
/// Holds the path to the comment database. Create one per operation or hold
/// for the duration of a session.
#[derive(Debug, Clone)]
pub struct RemarkContext {
    db_path: PathBuf,
}

impl RemarkContext {
    /// Create a new context for the database at `db_path`.
    #[must_use]
    pub fn new(db_path: &Path) -> Self {
        Self {
            db_path: db_path.to_path_buf(),
        }
    }

    /// Path to the comment database.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Whether the database file exists yet.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.db_path.exists()
    }

    /// Create the database (if needed) and its schema.
    pub fn init(&self) -> CoreResult<SqliteStore> {
        let store = SqliteStore::open(&self.db_path)?;
        store.init_schema()?;
        Ok(store)
    }

    /// Open an existing database, failing if it was never initialized.
    pub fn open_store(&self) -> CoreResult<SqliteStore> {
        if !self.is_initialized() {
            return Err(CoreError::NotInitialized {
                path: self.db_path.display().to_string(),
            });
        }
        self.init()
    }

    /// Create a `RemarkServices` instance backed by this context's database.
    pub fn services(&self) -> CoreResult<RemarkServices<SqliteStore>> {
        Ok(RemarkServices::new(self.open_store()?))
    }
}

/// Facade providing all remark service APIs over one store.
pub struct RemarkServices<S: Store> {
    store: S,
}

impl<S: Store> RemarkServices<S> {
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Access thread operations.
    #[must_use]
    pub const fn threads(&self) -> threads::ThreadService<'_, S> {
        threads::ThreadService::new(&self.store)
    }

    /// Access comment operations.
    #[must_use]
    pub const fn comments(&self) -> comments::CommentService<'_, S> {
        comments::CommentService::new(&self.store)
    }

    /// Get a reference to the underlying store.
    ///
    /// Useful for advanced queries not covered by the service layer.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_store_requires_init() {
        let dir = tempdir().unwrap();
        let ctx = RemarkContext::new(&dir.path().join("comments.db"));

        assert!(!ctx.is_initialized());
        assert!(matches!(
            ctx.open_store(),
            Err(CoreError::NotInitialized { .. })
        ));

        ctx.init().unwrap();
        assert!(ctx.is_initialized());
        assert!(ctx.services().is_ok());
    }
}
