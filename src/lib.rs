pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over the built-in filter.
/// Logs go to stderr so `verify` output on stdout stays machine-readable.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run() -> ExitCode {
    init_tracing();
    tracing::debug!("{} v{}", config::APP_NAME, config::APP_VERSION);
    ExitCode::from(cli::run())
}
