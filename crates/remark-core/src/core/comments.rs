//! Comment service: add comments and replies, read reply trees.

#![allow(clippy::missing_errors_doc)]

use chrono::Utc;
use tracing::debug;

use crate::model::{Comment, CommentId, Thread};
use crate::store::{Store, ThreadCriteria};
use crate::tree::{build_tree, CommentNode};

use super::{CoreError, CoreResult};

/// Service for comment operations.
pub struct CommentService<'a, S: Store> {
    store: &'a S,
}

impl<'a, S: Store> CommentService<'a, S> {
    pub(crate) const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Build a fresh, unsaved top-level comment on `thread`.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn create_comment(&self, thread: &Thread, author: &str, body: &str) -> Comment {
        Comment::new(thread, author, body)
    }

    /// Find one comment by id.
    pub fn find_comment_by_id(&self, id: CommentId) -> CoreResult<Option<Comment>> {
        Ok(self.store.find_comment(id)?)
    }

    /// Ancestor path for a reply to `parent`: the parent's own ancestors
    /// followed by the parent's id.
    ///
    /// Returns `Err(CoreError::InvalidState)` if the parent is unsaved.
    #[allow(clippy::unused_self)]
    pub fn compute_ancestors(&self, parent: &Comment) -> CoreResult<Vec<CommentId>> {
        let Some(parent_id) = parent.id else {
            return Err(CoreError::InvalidState {
                reason: "the parent comment must be saved before it can be replied to"
                    .to_string(),
            });
        };

        let mut ancestors = Vec::with_capacity(parent.ancestors.len() + 1);
        ancestors.extend_from_slice(&parent.ancestors);
        ancestors.push(parent_id);
        Ok(ancestors)
    }

    /// Save a new comment, optionally as a reply to `parent`.
    ///
    /// Bumps the owning thread's comment count and last-comment timestamp,
    /// inserts the comment and saves the thread, all in one transaction.
    /// On success `comment.id` and `comment.ancestors` are set and the
    /// updated thread is returned. On failure `comment` is left untouched.
    pub fn add_comment(
        &self,
        comment: &mut Comment,
        parent: Option<&Comment>,
    ) -> CoreResult<Thread> {
        if let Some(id) = comment.id {
            return Err(CoreError::AlreadyExists { id });
        }
        let Some(thread_id) = comment.thread_id.clone() else {
            return Err(CoreError::MissingThread);
        };

        let mut staged = comment.clone();
        if let Some(parent) = parent {
            let ancestors = self.compute_ancestors(parent)?;
            if parent.thread_id.as_deref() != Some(thread_id.as_str()) {
                return Err(CoreError::InvalidState {
                    reason: format!(
                        "parent comment {} belongs to a different thread",
                        ancestors.last().map_or_else(String::new, ToString::to_string)
                    ),
                });
            }
            staged.ancestors = ancestors;
        }

        let now = Utc::now();
        let (id, thread) = self.store.atomically(|store| -> CoreResult<_> {
            let mut thread = store
                .find_thread(&ThreadCriteria::identifier(thread_id.as_str()))?
                .ok_or_else(|| CoreError::ThreadNotFound {
                    identifier: thread_id.clone(),
                })?;

            thread.num_comments += 1;
            thread.last_comment_at = Some(now);

            let id = store.insert_comment(&staged)?;
            store.update_thread(&thread)?;
            Ok((id, thread))
        })?;

        // The caller's comment only changes once the transaction has committed.
        staged.id = Some(id);
        *comment = staged;
        debug!(
            thread = %thread.identifier,
            comment = %id,
            depth = comment.depth(),
            num_comments = thread.num_comments,
            "added comment"
        );
        Ok(thread)
    }

    /// All comments of a thread as a reply tree.
    ///
    /// Top-level comments come first in id order; each node's children are in
    /// arrival order.
    pub fn find_comments_by_thread(&self, thread: &Thread) -> CoreResult<Vec<CommentNode>> {
        let comments = self.store.comments_by_thread(&thread.identifier)?;
        debug!(thread = %thread.identifier, count = comments.len(), "building comment tree");
        build_tree(comments)
    }
}
