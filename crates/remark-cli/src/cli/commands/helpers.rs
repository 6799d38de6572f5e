//! Shared helpers for CLI commands.

use anyhow::{anyhow, Result};
use std::path::Path;

use remark_core::{CoreError, RemarkContext, RemarkServices, SqliteStore};

/// Open the comment database and return the service facade.
///
/// Fails with an `init` hint when the database does not exist yet.
pub fn open_services(db_path: &Path) -> Result<RemarkServices<SqliteStore>> {
    Ok(RemarkContext::new(db_path).services()?)
}

/// Build a helpful error for a missing thread.
pub fn thread_not_found_error(identifier: &str) -> anyhow::Error {
    anyhow!(CoreError::ThreadNotFound {
        identifier: identifier.to_string(),
    })
    .context(format!(
        "Create it first with: remark threads add {identifier}"
    ))
}
