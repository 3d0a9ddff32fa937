use std::io;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logging system
pub fn init_logger() {
    // Use RUST_LOG environment variable, default to info level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // try_init: a second call (tests, embedding) must not panic
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr) // Keep stdout for the transcript
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .try_init();
}

/// Log an info message with a short tag prefix
pub fn log_info(tag: &str, message: impl std::fmt::Display) {
    info!("[{}] {}", tag, message);
}

/// Log a warning message with a short tag prefix
pub fn log_warn(tag: &str, message: impl std::fmt::Display) {
    warn!("[{}] {}", tag, message);
}

/// Log an error message with a short tag prefix
pub fn log_error(tag: &str, message: impl std::fmt::Display) {
    error!("[{}] {}", tag, message);
}
