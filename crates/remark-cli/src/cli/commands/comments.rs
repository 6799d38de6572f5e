//! Implementation of `remark comments` subcommands.

use anyhow::{anyhow, Result};
use std::path::Path;

use crate::cli::commands::helpers::{open_services, thread_not_found_error};
use crate::output::{Formatter, OutputFormat};
use remark_core::identity::get_author_identity;
use remark_core::{CommentId, CoreError};

/// Add a comment to a thread, optionally as a reply.
#[tracing::instrument(skip(message, format))]
pub fn run_comments_add(
    db_path: &Path,
    thread_id: &str,
    message: &str,
    reply_to: Option<CommentId>,
    author: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let services = open_services(db_path)?;

    let thread = match services.threads().find_thread(thread_id) {
        Ok(thread) => thread,
        Err(CoreError::ThreadNotFound { .. }) => return Err(thread_not_found_error(thread_id)),
        Err(e) => return Err(e.into()),
    };

    let parent = match reply_to {
        Some(id) => Some(
            services
                .comments()
                .find_comment_by_id(id)?
                .ok_or_else(|| anyhow!("Comment not found: {id}"))?,
        ),
        None => None,
    };

    let author_str = get_author_identity(author)?;
    let mut comment = services
        .comments()
        .create_comment(&thread, &author_str, message);
    let thread = services
        .comments()
        .add_comment(&mut comment, parent.as_ref())?;

    let output = serde_json::json!({
        "comment_id": comment.id,
        "thread_id": thread.identifier,
        "author": comment.author,
        "depth": comment.depth(),
        "reply_to": comment.parent_id(),
        "num_comments": thread.num_comments,
    });
    Formatter::new(format).print(&output)
}

/// Show a single comment.
#[tracing::instrument(skip(format))]
pub fn run_comments_show(db_path: &Path, id: CommentId, format: OutputFormat) -> Result<()> {
    let services = open_services(db_path)?;
    let comment = services
        .comments()
        .find_comment_by_id(id)?
        .ok_or_else(|| anyhow!("Comment not found: {id}"))?;

    Formatter::new(format).print(&comment)
}

/// Show every comment of a thread as a reply tree.
#[tracing::instrument(skip(format))]
pub fn run_comments_tree(db_path: &Path, thread_id: &str, format: OutputFormat) -> Result<()> {
    let services = open_services(db_path)?;

    let thread = match services.threads().find_thread(thread_id) {
        Ok(thread) => thread,
        Err(CoreError::ThreadNotFound { .. }) => return Err(thread_not_found_error(thread_id)),
        Err(e) => return Err(e.into()),
    };

    let tree = services.comments().find_comments_by_thread(&thread)?;
    Formatter::new(format).print_tree(&thread.identifier, &tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::init::run_init;
    use crate::cli::commands::threads::run_threads_add;
    use rusqlite::Connection;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("comments.db");
        run_init(&db_path, OutputFormat::Json).unwrap();
        run_threads_add(&db_path, "post-1", None, OutputFormat::Json).unwrap();
        (dir, db_path)
    }

    #[test]
    fn test_add_reply_and_render_tree() {
        let (_dir, db_path) = setup();

        run_comments_add(&db_path, "post-1", "top", None, Some("alice"), OutputFormat::Json)
            .unwrap();
        run_comments_add(
            &db_path,
            "post-1",
            "reply",
            Some(CommentId::new(1)),
            Some("bob"),
            OutputFormat::Json,
        )
        .unwrap();
        run_comments_tree(&db_path, "post-1", OutputFormat::Text).unwrap();
        run_comments_show(&db_path, CommentId::new(2), OutputFormat::Json).unwrap();

        // Inspect the raw rows to confirm what the CLI persisted
        let conn = Connection::open(&db_path).unwrap();
        let (author, ancestors): (String, String) = conn
            .query_row(
                "SELECT author, ancestors FROM comments WHERE comment_id = 2",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(author, "bob");
        assert_eq!(ancestors, "0000000000000000001");

        let num_comments: i64 = conn
            .query_row(
                "SELECT num_comments FROM threads WHERE identifier = 'post-1'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(num_comments, 2);
    }

    #[test]
    fn test_reply_to_missing_comment_fails() {
        let (_dir, db_path) = setup();

        let err = run_comments_add(
            &db_path,
            "post-1",
            "reply",
            Some(CommentId::new(99)),
            Some("bob"),
            OutputFormat::Json,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Comment not found"));
    }

    #[test]
    fn test_comment_on_missing_thread_hints_at_creation() {
        let (_dir, db_path) = setup();

        let err = run_comments_add(&db_path, "nope", "hi", None, Some("alice"), OutputFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("remark threads add nope"));
    }
}
