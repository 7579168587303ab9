//! Structured logging initialization via `tracing`.

/// Initialize the tracing subscriber with sensible defaults.
///
/// Respects the `RUST_LOG` environment variable for filtering.
/// `json` selects newline-delimited JSON output for log shippers.
pub fn init_tracing(json: bool) {
    use tracing_subscriber::EnvFilter;
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
