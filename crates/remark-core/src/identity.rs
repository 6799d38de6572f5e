//! Author identity resolution.
//!
//! Determines the author recorded on new comments from an explicit override
//! or the environment.

use anyhow::{bail, Result};
use std::env;

/// Environment variables checked for the author, in priority order.
const IDENTITY_VARS: &[&str] = &["REMARK_AUTHOR", "AUTHOR"];

/// Fallback to system user
const USER_VAR: &str = "USER";

/// Get the current author identity.
///
/// Resolution order:
/// 1. Explicit override (`--author`)
/// 2. `REMARK_AUTHOR` environment variable
/// 3. `AUTHOR` environment variable
/// 4. `USER` environment variable
///
/// # Errors
///
/// Returns an error if none of these is set.
pub fn get_author_identity(explicit: Option<&str>) -> Result<String> {
    if let Some(name) = explicit.filter(|name| !name.trim().is_empty()) {
        return Ok(name.to_string());
    }

    for var in IDENTITY_VARS.iter().chain(std::iter::once(&USER_VAR)) {
        if let Ok(name) = env::var(var) {
            if !name.is_empty() {
                return Ok(name);
            }
        }
    }

    bail!("Author identity required. Use --author <name> or set REMARK_AUTHOR.")
}
