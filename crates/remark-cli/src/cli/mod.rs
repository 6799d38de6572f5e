//! CLI command definitions and handlers.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use remark_core::CommentId;

pub mod commands;

/// Default location of the comment database, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = ".remark/comments.db";

/// Threaded comments with nested replies, stored in a local database
#[derive(Parser, Debug)]
#[command(name = "remark")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output JSON instead of concise text
    #[arg(long, global = true)]
    pub json: bool,

    /// Override author identity (default: $REMARK_AUTHOR or $AUTHOR or $USER)
    #[arg(long, global = true)]
    pub author: Option<String>,

    /// Path to the comment database
    #[arg(long, global = true, env = "REMARK_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the comment database
    Init,

    /// Manage threads
    #[command(subcommand)]
    Threads(ThreadsCommands),

    /// Manage comments
    #[command(subcommand)]
    Comments(CommentsCommands),
}

// ============================================================================
// Threads subcommands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ThreadsCommands {
    /// Create a new thread
    Add {
        /// Thread identifier (e.g. a URL slug)
        identifier: String,

        /// Permalink of the page the thread belongs to
        #[arg(long)]
        permalink: Option<String>,
    },

    /// Show the first thread matching the given fields
    Show {
        /// Match on identifier
        #[arg(long)]
        identifier: Option<String>,

        /// Match on permalink
        #[arg(long)]
        permalink: Option<String>,
    },
}

// ============================================================================
// Comments subcommands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum CommentsCommands {
    /// Add a comment to a thread
    Add {
        /// Thread identifier
        thread: String,

        /// Comment body (alternative to --message)
        #[arg(value_name = "MESSAGE")]
        message_positional: Option<String>,

        /// Comment body
        #[arg(long, short = 'm')]
        message: Option<String>,

        /// Id of the comment being replied to
        #[arg(long)]
        reply_to: Option<CommentId>,
    },

    /// Show a single comment
    Show {
        /// Comment id
        id: CommentId,
    },

    /// Show all comments of a thread as a reply tree
    Tree {
        /// Thread identifier
        thread: String,
    },
}
