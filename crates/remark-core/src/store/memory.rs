//! In-memory store backed by ordered maps.

use std::cell::RefCell;
use std::collections::BTreeMap;

use anyhow::{bail, Result};
use tracing::debug;

use super::{Store, ThreadCriteria};
use crate::model::{Comment, CommentId, Thread};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    threads: BTreeMap<String, Thread>,
    comments: BTreeMap<CommentId, Comment>,
    last_id: i64,
}

/// Map-backed store. Transactions snapshot the whole state and restore it
/// when the scope fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RefCell<MemoryState>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored comments across all threads.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        self.state.borrow().comments.len()
    }
}

impl Store for MemoryStore {
    fn find_thread(&self, criteria: &ThreadCriteria) -> Result<Option<Thread>> {
        Ok(self
            .state
            .borrow()
            .threads
            .values()
            .find(|thread| criteria.matches(thread))
            .cloned())
    }

    fn insert_thread(&self, thread: &Thread) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.threads.contains_key(&thread.identifier) {
            bail!("Thread {} already exists", thread.identifier);
        }
        state
            .threads
            .insert(thread.identifier.clone(), thread.clone());
        Ok(())
    }

    fn update_thread(&self, thread: &Thread) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let Some(stored) = state.threads.get_mut(&thread.identifier) else {
            bail!("Cannot update unsaved thread {}", thread.identifier);
        };
        stored.permalink.clone_from(&thread.permalink);
        stored.num_comments = thread.num_comments;
        stored.last_comment_at = thread.last_comment_at;
        Ok(())
    }

    fn find_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        Ok(self.state.borrow().comments.get(&id).cloned())
    }

    fn insert_comment(&self, comment: &Comment) -> Result<CommentId> {
        let mut state = self.state.borrow_mut();
        let Some(thread_id) = comment.thread_id.as_deref() else {
            bail!("Cannot insert a comment without a thread");
        };
        if !state.threads.contains_key(thread_id) {
            bail!("Cannot insert comment into unknown thread {thread_id}");
        }

        state.last_id += 1;
        let id = CommentId::new(state.last_id);
        let mut stored = comment.clone();
        stored.id = Some(id);
        state.comments.insert(id, stored);

        debug!(thread = thread_id, comment = %id, "inserted comment");
        Ok(id)
    }

    fn comments_by_thread(&self, thread_id: &str) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state
            .borrow()
            .comments
            .values()
            .filter(|c| c.thread_id.as_deref() == Some(thread_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.ancestors.cmp(&b.ancestors).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        let snapshot = self.state.borrow().clone();
        let result = f(self);
        if result.is_err() {
            *self.state.borrow_mut() = snapshot;
        }
        result
    }
}
