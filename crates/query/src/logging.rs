//! Tracing subscriber setup.

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Returns false if a
/// global subscriber was already installed, in which case nothing changes.
pub fn init(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init().is_ok()
    } else {
        builder.compact().try_init().is_ok()
    };
    if installed {
        tracing::debug!(level = %config.level, format = %config.format, "logging initialized");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_safe() {
        let config = LoggingConfig {
            level: "not a [valid filter".to_string(),
            format: "json".to_string(),
        };
        let first = init(&config);
        let second = init(&LoggingConfig::default());
        // whichever test got here first owns the global subscriber
        assert!(!second || !first);
    }
}
