//! Thread service: create, add, find.

#![allow(clippy::missing_errors_doc)]

use tracing::debug;

use crate::model::Thread;
use crate::store::{Store, ThreadCriteria};

use super::{CoreError, CoreResult};

/// Service for thread operations.
pub struct ThreadService<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> ThreadService<'a, S> {
    pub(crate) const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Build a fresh, unsaved thread.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn create_thread(&self, identifier: &str) -> Thread {
        Thread::new(identifier)
    }

    /// Find the first thread matching the criteria.
    ///
    /// Returns `Ok(None)` when nothing matches.
    pub fn find_thread_by(&self, criteria: &ThreadCriteria) -> CoreResult<Option<Thread>> {
        Ok(self.store.find_thread(criteria)?)
    }

    /// Get a thread by identifier.
    ///
    /// Returns `Err(CoreError::ThreadNotFound)` if the thread does not exist.
    pub fn find_thread(&self, identifier: &str) -> CoreResult<Thread> {
        self.find_thread_by(&ThreadCriteria::identifier(identifier))?
            .ok_or_else(|| CoreError::ThreadNotFound {
                identifier: identifier.to_string(),
            })
    }

    /// Save a new thread.
    ///
    /// The store rejects identifiers that are already taken.
    pub fn add_thread(&self, thread: &Thread) -> CoreResult<()> {
        self.store.insert_thread(thread)?;
        debug!(thread = %thread.identifier, "added thread");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::RemarkServices;
    use crate::store::{MemoryStore, SqliteStore};

    use super::*;

    fn memory_services() -> RemarkServices<MemoryStore> {
        RemarkServices::new(MemoryStore::new())
    }

    #[test]
    fn test_create_thread_is_unsaved() {
        let services = memory_services();
        let thread = services.threads().create_thread("post-1");

        assert_eq!(thread.identifier, "post-1");
        assert_eq!(thread.num_comments, 0);
        assert!(services
            .threads()
            .find_thread_by(&ThreadCriteria::identifier("post-1"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_add_then_find() {
        let services = memory_services();
        let threads = services.threads();
        let thread = threads
            .create_thread("post-1")
            .with_permalink("https://example.org/post-1");
        threads.add_thread(&thread).unwrap();

        let found = threads.find_thread("post-1").unwrap();
        assert_eq!(found, thread);

        let by_link = threads
            .find_thread_by(&ThreadCriteria::permalink("https://example.org/post-1"))
            .unwrap();
        assert_eq!(by_link.map(|t| t.identifier), Some("post-1".to_string()));
    }

    #[test]
    fn test_find_missing_thread() {
        let services = memory_services();

        assert!(services
            .threads()
            .find_thread_by(&ThreadCriteria::identifier("nope"))
            .unwrap()
            .is_none());

        assert!(matches!(
            services.threads().find_thread("nope"),
            Err(CoreError::ThreadNotFound { identifier }) if identifier == "nope"
        ));
    }

    #[test]
    fn test_add_duplicate_thread_is_storage_error() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.init_schema().unwrap();
        let services = RemarkServices::new(store);

        let thread = services.threads().create_thread("post-1");
        services.threads().add_thread(&thread).unwrap();

        assert!(matches!(
            services.threads().add_thread(&thread),
            Err(CoreError::Storage(_))
        ));
    }
}
