//! Tracing subscriber setup.
//!
//! Logs go to stderr so they never mix with command output on stdout.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `remark_core=debug`).
pub const LOG_ENV_VAR: &str = "REMARK_LOG";

/// Install the global subscriber. `json` switches to structured JSON lines.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
