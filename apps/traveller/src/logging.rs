//! Tracing subscriber setup.  Everything goes to stderr; stdout belongs to
//! the game protocol.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.  An explicit `level` (any `EnvFilter`
/// directive) wins over `RUST_LOG`; the fallback is `info`.
pub fn init(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
