use std::borrow::Cow;

use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber for tests.
///
/// `RUST_LOG` takes precedence over the provided `filter`.
/// Repeated calls are no-ops.
pub fn init_logger(test_name: &str, filter: &str) {
    let mut filter = Cow::Borrowed(filter);
    if let Ok(env) = std::env::var(EnvFilter::DEFAULT_ENV) {
        filter = Cow::Owned(env);
    }

    let filter = EnvFilter::try_new(filter.as_ref()).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok();

    tracing::info!("{test_name}");
}
