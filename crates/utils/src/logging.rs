use commonutil_core::{UtilsConfig, COMMONUTIL_LOG_VAR};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn, Level};

/// Install a compact stderr subscriber for the helpers' diagnostics
///
/// The filter comes from `COMMONUTIL_LOG`, then `RUST_LOG`, then the
/// configured default. Fails if a global subscriber is already set.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = EnvFilter::try_from_env(COMMONUTIL_LOG_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(&UtilsConfig::global().log_filter))?;

    install(filter)
}

/// Like [`init`] but with an explicit filter directive such as `"debug"`
pub fn init_with_filter(
    directives: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    install(EnvFilter::try_new(directives)?)
}

fn install(filter: EnvFilter) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .compact()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_is_rejected() {
        assert!(init_with_filter("commonutil=loudest").is_err());
    }

    #[test]
    fn test_second_init_fails() {
        // Only one global subscriber can exist per process
        let first = init_with_filter("warn");
        let second = init_with_filter("warn");
        assert!(first.is_err() || second.is_err());
    }
}
