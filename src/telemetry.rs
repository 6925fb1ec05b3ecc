//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Log output formats accepted by `LOG_FORMAT`.
pub const LOG_FORMATS: [&str; 2] = ["text", "json"];

/// Installs the global tracing subscriber.
///
/// `log_level` is an `EnvFilter` directive string such as `info` or
/// `shortlink=debug,sqlx=warn`. Logs go to stderr so command output on stdout
/// stays machine-readable.
pub fn init(log_level: &str, log_format: &str) {
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_level(true);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
