//! Storage port for threads and comments.
//!
//! The services in [`crate::core`] depend only on the [`Store`] trait. Two
//! implementations ship with the crate:
//!
//! - [`SqliteStore`]: the on-disk store used by the CLI.
//! - [`MemoryStore`]: a map-backed store for tests and embedding.

#![allow(clippy::missing_errors_doc)]

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use anyhow::Result;

use crate::model::{Comment, CommentId, Thread};

/// Field filters for thread lookups. Unset fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadCriteria {
    pub identifier: Option<String>,
    pub permalink: Option<String>,
}

impl ThreadCriteria {
    /// Criteria matching a single thread identifier.
    pub fn identifier(identifier: impl Into<String>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            permalink: None,
        }
    }

    /// Criteria matching a thread permalink.
    pub fn permalink(permalink: impl Into<String>) -> Self {
        Self {
            identifier: None,
            permalink: Some(permalink.into()),
        }
    }

    /// Check whether a thread satisfies every set field.
    #[must_use]
    pub fn matches(&self, thread: &Thread) -> bool {
        self.identifier
            .as_deref()
            .is_none_or(|id| id == thread.identifier)
            && self
                .permalink
                .as_deref()
                .is_none_or(|p| thread.permalink.as_deref() == Some(p))
    }
}

/// Persistence operations over thread and comment records.
///
/// Methods take `&self`; implementations that need mutation use interior
/// mutability (`SQLite` connections already do).
pub trait Store {
    /// Find the first thread matching `criteria`, ordered by identifier.
    fn find_thread(&self, criteria: &ThreadCriteria) -> Result<Option<Thread>>;

    /// Insert a new thread. Fails if the identifier is already taken.
    fn insert_thread(&self, thread: &Thread) -> Result<()>;

    /// Overwrite the counters of an existing thread. Fails if the thread is unknown.
    fn update_thread(&self, thread: &Thread) -> Result<()>;

    /// Find a single comment by id.
    fn find_comment(&self, id: CommentId) -> Result<Option<Comment>>;

    /// Insert a new comment and return the identity assigned to it.
    ///
    /// The comment's own `id` field is ignored.
    fn insert_comment(&self, comment: &Comment) -> Result<CommentId>;

    /// All comments of a thread, ascending by ancestor path.
    ///
    /// Ancestor paths compare as tuples: a path sorts before every path it is
    /// a prefix of. Comments sharing the same ancestors sort by id. Every
    /// comment therefore appears after all of its ancestors.
    fn comments_by_thread(&self, thread_id: &str) -> Result<Vec<Comment>>;

    /// Run `f` so that either all of its writes happen or none do.
    fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        Self: Sized,
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<anyhow::Error>;
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::tree::{build_tree, CommentNode};

    use super::*;

    /// Insert a random reply forest spread over two threads. Each pick
    /// chooses a thread, then either a new top-level comment (slot 0) or a
    /// reply to an earlier comment of that thread.
    fn insert_forest<S: Store>(store: &S, picks: &[(bool, prop::sample::Index)]) -> Vec<Comment> {
        let threads = [Thread::new("left"), Thread::new("right")];
        for thread in &threads {
            store.insert_thread(thread).unwrap();
        }

        let mut inserted: Vec<Comment> = Vec::new();
        for (on_right, pick) in picks {
            let thread = &threads[usize::from(*on_right)];
            let siblings: Vec<&Comment> = inserted
                .iter()
                .filter(|c| c.thread_id.as_deref() == Some(thread.identifier.as_str()))
                .collect();

            let mut comment = Comment::new(thread, "tester", "body");
            let slot = pick.index(siblings.len() + 1);
            if slot > 0 {
                let parent = siblings[slot - 1];
                comment.ancestors.clone_from(&parent.ancestors);
                comment.ancestors.extend(parent.id);
            }
            comment.id = Some(store.insert_comment(&comment).unwrap());
            inserted.push(comment);
        }
        inserted
    }

    fn check_listing_order<S: Store>(
        store: &S,
        picks: &[(bool, prop::sample::Index)],
    ) -> Result<(), TestCaseError> {
        let inserted = insert_forest(store, picks);

        for thread_id in ["left", "right"] {
            let listed = store.comments_by_thread(thread_id).unwrap();
            let expected = inserted
                .iter()
                .filter(|c| c.thread_id.as_deref() == Some(thread_id))
                .count();
            prop_assert_eq!(listed.len(), expected);

            for (pos, comment) in listed.iter().enumerate() {
                prop_assert_eq!(comment.thread_id.as_deref(), Some(thread_id));
                for ancestor in &comment.ancestors {
                    let ancestor_pos = listed.iter().position(|o| o.id == Some(*ancestor));
                    prop_assert!(
                        matches!(ancestor_pos, Some(p) if p < pos),
                        "ancestor {} listed after {:?}",
                        ancestor,
                        comment.id
                    );
                }
            }

            let tree = build_tree(listed);
            prop_assert!(tree.is_ok());
            let total: usize = tree
                .unwrap_or_default()
                .iter()
                .map(CommentNode::comment_count)
                .sum();
            prop_assert_eq!(total, expected);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn sqlite_lists_ancestors_before_replies(
            picks in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 0..40)
        ) {
            let store = SqliteStore::open_in_memory().unwrap();
            store.init_schema().unwrap();
            check_listing_order(&store, &picks)?;
        }

        #[test]
        fn memory_lists_ancestors_before_replies(
            picks in prop::collection::vec((any::<bool>(), any::<prop::sample::Index>()), 0..40)
        ) {
            check_listing_order(&MemoryStore::new(), &picks)?;
        }
    }

    #[test]
    fn test_empty_criteria_matches_everything() {
        let thread = Thread::new("a");
        assert!(ThreadCriteria::default().matches(&thread));
    }

    #[test]
    fn test_criteria_fields_are_conjunctive() {
        let thread = Thread::new("a").with_permalink("https://x/a");

        assert!(ThreadCriteria::identifier("a").matches(&thread));
        assert!(!ThreadCriteria::identifier("b").matches(&thread));
        assert!(ThreadCriteria::permalink("https://x/a").matches(&thread));

        let both = ThreadCriteria {
            identifier: Some("a".to_string()),
            permalink: Some("https://x/other".to_string()),
        };
        assert!(!both.matches(&thread));
    }

    #[test]
    fn test_permalink_criteria_skips_threads_without_one() {
        let thread = Thread::new("a");
        assert!(!ThreadCriteria::permalink("https://x/a").matches(&thread));
    }
}
