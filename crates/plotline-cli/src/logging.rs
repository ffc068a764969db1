use tracing_subscriber::EnvFilter;

/// Initialize logging to stderr
///
/// Honors `RUST_LOG`; without it, logs at `debug` in debug builds and `info` otherwise.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(e) = result {
        eprintln!("Failed to initialize logging: {e}");
    }
}
