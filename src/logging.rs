use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `info` is used, or `debug` when
/// `verbose` is set. Logs go to stderr so the report on stdout stays clean.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Err(e) = result {
        // Already initialised, e.g. by a test harness.
        eprintln!("Warning: Logger initialization failed: {}", e);
    }
}
