//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Map the numeric `--loglevel` flag onto a level filter
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the flag when set
//! - Human-readable fmt output; the tool runs interactively

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level filter for a `--loglevel` value (0 most verbose, 6 silent).
pub fn level_filter(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::TRACE,
        1 => LevelFilter::DEBUG,
        2 => LevelFilter::INFO,
        3 => LevelFilter::WARN,
        4 | 5 => LevelFilter::ERROR,
        _ => LevelFilter::OFF,
    }
}

/// Install the global subscriber.
pub fn init_logging(level: u8) -> Result<(), String> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(level).into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init()
        .map_err(|e| format!("set logger failed, err: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_map() {
        assert_eq!(level_filter(0), LevelFilter::TRACE);
        assert_eq!(level_filter(1), LevelFilter::DEBUG);
        assert_eq!(level_filter(2), LevelFilter::INFO);
        assert_eq!(level_filter(3), LevelFilter::WARN);
        assert_eq!(level_filter(4), LevelFilter::ERROR);
        assert_eq!(level_filter(5), LevelFilter::ERROR);
        assert_eq!(level_filter(6), LevelFilter::OFF);
        assert_eq!(level_filter(42), LevelFilter::OFF);
    }
}
