use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Default filter directive when none is given
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Filter directive used by `--verbose`
pub const VERBOSE_LOG_LEVEL: &str = "debug";

/// Pick the effective filter directive.
///
/// An explicit `--log-level` (or `PLATFORM_UI_LOG`) wins over `--verbose`.
pub fn resolve_level(log_level: &str, verbose: bool) -> &str {
    if verbose && log_level == DEFAULT_LOG_LEVEL {
        VERBOSE_LOG_LEVEL
    } else {
        log_level
    }
}

/// Install the global tracing subscriber writing to stderr
pub fn init(log_level: &str) {
    let filter = match EnvFilter::try_new(log_level) {
        Ok(filter) => filter,
        Err(e) => {
            // Subscriber is not installed yet, so the warning is emitted after init
            let fallback = EnvFilter::new(DEFAULT_LOG_LEVEL);
            install(fallback);
            warn!("Invalid log level '{}': {}, using '{}'", log_level, e, DEFAULT_LOG_LEVEL);
            return;
        }
    };
    install(filter);
}

fn install(filter: EnvFilter) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_level_verbose_raises_default() {
        assert_eq!(resolve_level("info", true), "debug");
    }

    #[test]
    fn test_resolve_level_explicit_wins() {
        assert_eq!(resolve_level("warn", true), "warn");
        assert_eq!(resolve_level("trace", false), "trace");
    }

    #[test]
    fn test_resolve_level_default() {
        assert_eq!(resolve_level("info", false), "info");
    }
}
