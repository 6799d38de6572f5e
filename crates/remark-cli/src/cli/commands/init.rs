//! Implementation of `remark init`.

use anyhow::Result;
use std::path::Path;

use crate::output::{Formatter, OutputFormat};
use remark_core::RemarkContext;

/// Create the comment database and its schema. Safe to run more than once.
#[tracing::instrument(skip(format))]
pub fn run_init(db_path: &Path, format: OutputFormat) -> Result<()> {
    let ctx = RemarkContext::new(db_path);
    let existed = ctx.is_initialized();
    ctx.init()?;

    let output = serde_json::json!({
        "db": db_path.display().to_string(),
        "status": if existed { "already-initialized" } else { "initialized" },
    });
    Formatter::new(format).print(&output)
}
