//! Command implementations for the remark CLI.

pub mod comments;
pub mod helpers;
pub mod init;
pub mod threads;

pub use comments::{run_comments_add, run_comments_show, run_comments_tree};
pub use init::run_init;
pub use threads::{run_threads_add, run_threads_show};
