//! SQLite-backed store.
//!
//! Ancestor paths are stored as a single text column of fixed-width,
//! zero-padded ids joined by `/`. Byte order on that column equals tuple
//! order on the id sequence, so `ORDER BY ancestors` yields the order the
//! tree fold relies on.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use super::{Store, ThreadCriteria};
use crate::model::{Comment, CommentId, Thread};

/// Width of one path segment; fits any positive `i64`.
const SEGMENT_WIDTH: usize = 19;
const SEGMENT_SEPARATOR: char = '/';

/// Store persisting threads and comments in a SQLite database.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directories: {}", parent.display())
                })?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;

        debug!(path = %path.display(), "opened comment database");
        Ok(Self { conn })
    }

    /// Create an in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        Ok(Self { conn })
    }

    /// Initialize the database schema.
    ///
    /// Creates all tables and indexes if they don't exist.
    pub fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA_SQL)
            .context("Failed to initialize schema")?;
        Ok(())
    }

    /// Get a reference to the underlying connection (for advanced queries).
    #[must_use]
    pub const fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Store for SqliteStore {
    fn find_thread(&self, criteria: &ThreadCriteria) -> Result<Option<Thread>> {
        let mut sql = String::from(
            "SELECT identifier, permalink, num_comments, last_comment_at, created_at
             FROM threads WHERE 1=1",
        );
        let mut param_values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(identifier) = &criteria.identifier {
            sql.push_str(" AND identifier = ?");
            param_values.push(Box::new(identifier.clone()));
        }
        if let Some(permalink) = &criteria.permalink {
            sql.push_str(" AND permalink = ?");
            param_values.push(Box::new(permalink.clone()));
        }

        sql.push_str(" ORDER BY identifier ASC LIMIT 1");

        let params: Vec<&dyn rusqlite::ToSql> = param_values.iter().map(|p| p.as_ref()).collect();

        let row: Option<ThreadRow> = self
            .conn
            .query_row(&sql, params.as_slice(), ThreadRow::from_row)
            .optional()
            .context("Failed to query thread")?;

        row.map(ThreadRow::into_thread).transpose()
    }

    fn insert_thread(&self, thread: &Thread) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO threads (
                    identifier, permalink, num_comments, last_comment_at, created_at
                ) VALUES (?, ?, ?, ?, ?)",
                params![
                    thread.identifier,
                    thread.permalink,
                    thread.num_comments as i64,
                    thread.last_comment_at.map(|ts| ts.to_rfc3339()),
                    thread.created_at.to_rfc3339(),
                ],
            )
            .with_context(|| format!("Failed to insert thread {}", thread.identifier))?;

        debug!(thread = %thread.identifier, "inserted thread");
        Ok(())
    }

    fn update_thread(&self, thread: &Thread) -> Result<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE threads SET
                    permalink = ?,
                    num_comments = ?,
                    last_comment_at = ?
                WHERE identifier = ?",
                params![
                    thread.permalink,
                    thread.num_comments as i64,
                    thread.last_comment_at.map(|ts| ts.to_rfc3339()),
                    thread.identifier,
                ],
            )
            .with_context(|| format!("Failed to update thread {}", thread.identifier))?;

        if updated == 0 {
            bail!("Cannot update unsaved thread {}", thread.identifier);
        }
        Ok(())
    }

    fn find_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        let row: Option<CommentRow> = self
            .conn
            .query_row(
                "SELECT comment_id, thread_id, ancestors, author, body, created_at
                 FROM comments WHERE comment_id = ?",
                params![id.get()],
                CommentRow::from_row,
            )
            .optional()
            .context("Failed to query comment")?;

        row.map(CommentRow::into_comment).transpose()
    }

    fn insert_comment(&self, comment: &Comment) -> Result<CommentId> {
        let Some(thread_id) = comment.thread_id.as_deref() else {
            bail!("Cannot insert a comment without a thread");
        };

        self.conn
            .execute(
                "INSERT INTO comments (
                    thread_id, ancestors, author, body, created_at
                ) VALUES (?, ?, ?, ?, ?)",
                params![
                    thread_id,
                    encode_ancestors(&comment.ancestors),
                    comment.author,
                    comment.body,
                    comment.created_at.to_rfc3339(),
                ],
            )
            .with_context(|| format!("Failed to insert comment into thread {thread_id}"))?;

        let id = CommentId::new(self.conn.last_insert_rowid());
        debug!(thread = thread_id, comment = %id, depth = comment.depth(), "inserted comment");
        Ok(id)
    }

    fn comments_by_thread(&self, thread_id: &str) -> Result<Vec<Comment>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT comment_id, thread_id, ancestors, author, body, created_at
                 FROM comments
                 WHERE thread_id = ?
                 ORDER BY ancestors ASC, comment_id ASC",
            )
            .context("Failed to prepare comments_by_thread query")?;

        let rows = stmt
            .query_map(params![thread_id], CommentRow::from_row)
            .context("Failed to execute comments_by_thread query")?;

        let mut results = Vec::new();
        for row in rows {
            let row = row.context("Failed to read comment row")?;
            results.push(row.into_comment()?);
        }
        Ok(results)
    }

    fn atomically<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<anyhow::Error>,
    {
        let tx = self
            .conn
            .unchecked_transaction()
            .context("Failed to begin transaction")?;

        // Dropping `tx` on the error path rolls back.
        let value = f(self)?;

        tx.commit().context("Failed to commit transaction")?;
        Ok(value)
    }
}

// ============================================================================
// Row mapping
// ============================================================================

struct ThreadRow {
    identifier: String,
    permalink: Option<String>,
    num_comments: i64,
    last_comment_at: Option<String>,
    created_at: String,
}

impl ThreadRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            identifier: row.get(0)?,
            permalink: row.get(1)?,
            num_comments: row.get(2)?,
            last_comment_at: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_thread(self) -> Result<Thread> {
        Ok(Thread {
            last_comment_at: self.last_comment_at.as_deref().map(parse_ts).transpose()?,
            created_at: parse_ts(&self.created_at)?,
            identifier: self.identifier,
            permalink: self.permalink,
            num_comments: self.num_comments as u64,
        })
    }
}

struct CommentRow {
    comment_id: i64,
    thread_id: String,
    ancestors: String,
    author: String,
    body: String,
    created_at: String,
}

impl CommentRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            comment_id: row.get(0)?,
            thread_id: row.get(1)?,
            ancestors: row.get(2)?,
            author: row.get(3)?,
            body: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_comment(self) -> Result<Comment> {
        let ancestors = decode_ancestors(&self.ancestors)
            .with_context(|| format!("Bad ancestor path on comment {}", self.comment_id))?;
        Ok(Comment {
            id: Some(CommentId::new(self.comment_id)),
            thread_id: Some(self.thread_id),
            ancestors,
            author: self.author,
            body: self.body,
            created_at: parse_ts(&self.created_at)?,
        })
    }
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid timestamp: {raw}"))?
        .with_timezone(&Utc))
}

fn encode_ancestors(ancestors: &[CommentId]) -> String {
    ancestors
        .iter()
        .map(|id| format!("{:0width$}", id.get(), width = SEGMENT_WIDTH))
        .collect::<Vec<_>>()
        .join(&SEGMENT_SEPARATOR.to_string())
}

fn decode_ancestors(raw: &str) -> Result<Vec<CommentId>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    raw.split(SEGMENT_SEPARATOR)
        .map(|segment| {
            segment
                .parse::<CommentId>()
                .with_context(|| format!("Invalid path segment: {segment}"))
        })
        .collect()
}

// ============================================================================
// Schema SQL
// ============================================================================

const SCHEMA_SQL: &str = r"
-- THREADS
CREATE TABLE IF NOT EXISTS threads (
    identifier TEXT PRIMARY KEY,
    permalink TEXT,
    num_comments INTEGER NOT NULL DEFAULT 0 CHECK (num_comments >= 0),
    last_comment_at TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_threads_permalink ON threads(permalink);

-- COMMENTS
CREATE TABLE IF NOT EXISTS comments (
    comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
    thread_id TEXT NOT NULL REFERENCES threads(identifier),
    ancestors TEXT NOT NULL DEFAULT '',
    author TEXT NOT NULL,
    body TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_thread_path ON comments(thread_id, ancestors, comment_id);
";

// ============================================================================
// Tests
// ============================================================================
