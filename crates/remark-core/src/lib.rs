//! remark-core: domain logic for threaded comments.
//!
//! This crate owns the thread/comment model, the storage port and its `SQLite`
//! and in-memory implementations, reply-tree reconstruction, and the service
//! layer that keeps thread counters in step with comment inserts.

pub mod core;
pub mod identity;
pub mod model;
pub mod store;
pub mod tree;

pub use crate::core::{CoreError, CoreResult, RemarkContext, RemarkServices};
pub use crate::model::{Comment, CommentId, Thread};
pub use crate::store::{MemoryStore, SqliteStore, Store, ThreadCriteria};
pub use crate::tree::{build_tree, CommentNode};
