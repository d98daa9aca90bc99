//! Diagnostic logging using `tracing` + `tracing-subscriber`.
//!
//! The level is taken from the `WISH_LOG` environment variable
//! (e.g. "debug"). When it is unset or unrecognised, logging stays off so
//! that standard error carries nothing but the shell's own error message.

use anyhow::Result;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt;

/// Environment variable selecting the log level.
pub const LOG_ENV_VAR: &str = "WISH_LOG";

/// Install the global subscriber. Call once at startup.
pub fn init_logging() -> Result<()> {
    let level = std::env::var(LOG_ENV_VAR)
        .ok()
        .and_then(|s| parse_level_str(&s))
        .unwrap_or(LevelFilter::OFF);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;

    Ok(())
}

fn parse_level_str(s: &str) -> Option<LevelFilter> {
    match s.trim().to_lowercase().as_str() {
        "off" => Some(LevelFilter::OFF),
        "error" => Some(LevelFilter::ERROR),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "debug" => Some(LevelFilter::DEBUG),
        "trace" => Some(LevelFilter::TRACE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_str() {
        assert_eq!(parse_level_str("debug"), Some(LevelFilter::DEBUG));
        assert_eq!(parse_level_str(" WARNING "), Some(LevelFilter::WARN));
        assert_eq!(parse_level_str("loud"), None);
    }
}
