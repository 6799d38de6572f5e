//! Implementation of `remark threads` subcommands.

use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::commands::helpers::open_services;
use crate::output::{Formatter, OutputFormat};
use remark_core::ThreadCriteria;

/// Create a new thread.
#[tracing::instrument(skip(format))]
pub fn run_threads_add(
    db_path: &Path,
    identifier: &str,
    permalink: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let services = open_services(db_path)?;
    let threads = services.threads();

    let mut thread = threads.create_thread(identifier);
    thread.permalink = permalink;
    threads.add_thread(&thread)?;

    Formatter::new(format).print(&thread)
}

/// Show the first thread matching the given fields.
#[tracing::instrument(skip(format))]
pub fn run_threads_show(
    db_path: &Path,
    identifier: Option<String>,
    permalink: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    if identifier.is_none() && permalink.is_none() {
        bail!("Specify --identifier or --permalink");
    }

    let services = open_services(db_path)?;
    let criteria = ThreadCriteria {
        identifier,
        permalink,
    };

    let Some(thread) = services.threads().find_thread_by(&criteria)? else {
        bail!("No thread matches {criteria:?}");
    };

    Formatter::new(format).print(&thread)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::init::run_init;
    use tempfile::tempdir;

    #[test]
    fn test_add_and_show_thread() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("comments.db");
        run_init(&db_path, OutputFormat::Json).unwrap();

        run_threads_add(
            &db_path,
            "post-1",
            Some("https://example.org/post-1".to_string()),
            OutputFormat::Json,
        )
        .unwrap();

        run_threads_show(
            &db_path,
            None,
            Some("https://example.org/post-1".to_string()),
            OutputFormat::Text,
        )
        .unwrap();

        assert!(run_threads_show(&db_path, Some("missing".to_string()), None, OutputFormat::Text)
            .is_err());
    }

    #[test]
    fn test_add_duplicate_thread_fails() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("comments.db");
        run_init(&db_path, OutputFormat::Json).unwrap();

        run_threads_add(&db_path, "post-1", None, OutputFormat::Json).unwrap();
        assert!(run_threads_add(&db_path, "post-1", None, OutputFormat::Json).is_err());
    }

    #[test]
    fn test_commands_require_init() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("comments.db");

        let err = run_threads_add(&db_path, "post-1", None, OutputFormat::Json).unwrap_err();
        assert!(err.to_string().contains("remark init"));
    }
}
