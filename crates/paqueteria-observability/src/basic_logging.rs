use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Dependencies that log every connection and request at `debug`/`trace`.
const NOISY_TARGETS: [&str; 5] = ["reqwest", "hyper", "hyper_util", "h2", "rustls"];

/// Filter directives for `level`, with noisy dependencies held at `warn`.
pub fn default_directives(level: &str) -> String {
    let mut directives = level.to_string();
    for target in NOISY_TARGETS {
        directives.push_str(&format!(",{target}=warn"));
    }
    directives
}

/// Initialize console logging for tracing macros.
///
/// # Configuration
///
/// - **Filter**: `RUST_LOG` when set, otherwise `LOG_LEVEL` (default: "warn")
/// - **Format**: compact, with targets, to stderr so it does not interleave
///   with the progress lines on stdout
pub fn init_basic_console_logging() {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level)));

    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(console_layer).init();
}
