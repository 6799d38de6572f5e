//! Domain types: threads, comments, and comment identifiers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to a comment by the store when it is first persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A named discussion container accumulating comments.
///
/// The identifier is assigned by the caller (a URL slug, a resource key).
/// `num_comments` and `last_comment_at` are denormalized counters kept up to
/// date by comment insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
    pub num_comments: u64,
    pub last_comment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Thread {
    /// A fresh, unpersisted thread with zeroed counters.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            permalink: None,
            num_comments: 0,
            last_comment_at: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = Some(permalink.into());
        self
    }
}

/// A single reply unit belonging to exactly one thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// `None` until the store assigns an identity.
    pub id: Option<CommentId>,
    /// Identifier of the owning thread. Required before insertion.
    pub thread_id: Option<String>,
    /// Ids from the root comment down to the direct parent. Empty for
    /// top-level comments.
    pub ancestors: Vec<CommentId>,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// A fresh, unpersisted top-level comment on `thread`.
    pub fn new(thread: &Thread, author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: None,
            thread_id: Some(thread.identifier.clone()),
            ancestors: Vec::new(),
            author: author.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Nesting level below the thread root (0 for top-level comments).
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.ancestors.len()
    }

    /// Id of the direct parent, if this comment is a reply.
    #[must_use]
    pub fn parent_id(&self) -> Option<CommentId> {
        self.ancestors.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_thread_has_zero_counters() {
        let thread = Thread::new("blog/hello-world").with_permalink("https://example.org/hello");
        assert_eq!(thread.identifier, "blog/hello-world");
        assert_eq!(thread.permalink.as_deref(), Some("https://example.org/hello"));
        assert_eq!(thread.num_comments, 0);
        assert!(thread.last_comment_at.is_none());
    }

    #[test]
    fn test_new_comment_is_unpersisted_top_level() {
        let thread = Thread::new("t");
        let comment = Comment::new(&thread, "alice", "first!");
        assert!(!comment.is_persisted());
        assert_eq!(comment.thread_id.as_deref(), Some("t"));
        assert_eq!(comment.depth(), 0);
        assert_eq!(comment.parent_id(), None);
    }

    #[test]
    fn test_parent_id_is_last_ancestor() {
        let thread = Thread::new("t");
        let mut comment = Comment::new(&thread, "bob", "reply");
        comment.ancestors = vec![CommentId::new(3), CommentId::new(7)];
        assert_eq!(comment.depth(), 2);
        assert_eq!(comment.parent_id(), Some(CommentId::new(7)));
    }

    #[test]
    fn test_comment_id_parse() {
        assert_eq!(" 42 ".parse::<CommentId>().unwrap(), CommentId::new(42));
        assert!("c-42".parse::<CommentId>().is_err());
        assert_eq!(CommentId::new(9).to_string(), "9");
    }
}
