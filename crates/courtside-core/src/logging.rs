// Tracing subscriber setup shared by the binaries.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Build the event filter: `RUST_LOG` wins when set and valid, otherwise the
/// configured directives are used.
pub fn build_filter(configured: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
}

/// Install a global `fmt` subscriber writing to stderr, so report output on
/// stdout stays clean.
pub fn init_tracing(configured: &str) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(build_filter(configured))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
}
