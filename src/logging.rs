//! Tracing subscriber setup shared by the server and the admin CLI.

use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber.
///
/// `level` is an `EnvFilter` directive such as `info` or
/// `linkforge=debug,tower_http=info`; an unparsable directive falls back to
/// `info`. `format` is `json` for one JSON object per line, anything else for
/// human-readable text.
pub fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_target(true);

    // A second install (tests, repeated CLI setup) keeps the first subscriber.
    if format == "json" {
        let _ = builder.json().try_init();
    } else {
        let _ = builder.try_init();
    }
}
