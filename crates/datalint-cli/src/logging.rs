//! Tracing subscriber setup.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Map the `-v` count to a level. Warnings are always shown.
pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the level.
pub fn init(verbose: u8) {
    let level = level_for(verbose).as_str().to_lowercase();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,datalint={level},datalint_cli={level}")));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose > 0)
        .without_time();

    // Ignore a second install, e.g. under tests.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::DEBUG);
        assert_eq!(level_for(5), Level::TRACE);
    }
}
