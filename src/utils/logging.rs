use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Initialize tracing for the broker from the configured logging settings.
///
/// The configured level acts as the default directive; `RUST_LOG` can still
/// override it per target at runtime.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    // try_init keeps repeated calls from panicking when tests share a process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
