//! Reply tree reconstruction.
//!
//! Comments come out of the store as a flat list sorted by ancestor path.
//! Because a path always sorts before every path it prefixes, each comment's
//! ancestors are already in the tree by the time the comment itself is
//! reached, so a single pass builds the whole structure.

use serde::Serialize;
use tracing::error;

use crate::core::{CoreError, CoreResult};
use crate::model::{Comment, CommentId};

/// A comment together with its direct replies, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentNode {
    pub comment: Comment,
    pub children: Vec<Self>,
}

impl CommentNode {
    #[must_use]
    pub const fn new(comment: Comment) -> Self {
        Self {
            comment,
            children: Vec::new(),
        }
    }

    /// Number of comments in this subtree, including this node.
    #[must_use]
    pub fn comment_count(&self) -> usize {
        1 + self.children.iter().map(Self::comment_count).sum::<usize>()
    }

    /// Depth-first pre-order walk yielding `(depth, comment)` pairs.
    pub fn walk(&self) -> impl Iterator<Item = (usize, &Comment)> + '_ {
        let mut stack = vec![(0_usize, self)];
        std::iter::from_fn(move || {
            let (depth, node) = stack.pop()?;
            stack.extend(node.children.iter().rev().map(|child| (depth + 1, child)));
            Some((depth, &node.comment))
        })
    }
}

/// Fold comments sorted by ancestor path into a forest of top-level nodes.
///
/// # Errors
///
/// Returns [`CoreError::Corrupted`] when a comment names an ancestor that has
/// not been seen earlier in the input, and [`CoreError::InvalidState`] for a
/// comment without an id.
pub fn build_tree<I>(comments: I) -> CoreResult<Vec<CommentNode>>
where
    I: IntoIterator<Item = Comment>,
{
    let mut roots: Vec<CommentNode> = Vec::new();

    for comment in comments {
        let Some(comment_id) = comment.id else {
            return Err(CoreError::InvalidState {
                reason: "cannot place an unsaved comment in a tree".to_string(),
            });
        };

        let mut level = &mut roots;
        for &ancestor in &comment.ancestors {
            match find_child(level, ancestor) {
                Some(node) => level = &mut node.children,
                None => {
                    error!(comment = %comment_id, %ancestor, "dangling ancestor in comment tree");
                    return Err(CoreError::Corrupted {
                        comment_id,
                        ancestor,
                    });
                }
            }
        }
        level.push(CommentNode::new(comment));
    }

    Ok(roots)
}

/// Siblings arrive in id order, so the most recent match is at the back.
fn find_child(level: &mut [CommentNode], id: CommentId) -> Option<&mut CommentNode> {
    level
        .iter_mut()
        .rev()
        .find(|node| node.comment.id == Some(id))
}
