//! Logger bootstrap.
//!
//! Uses the [`log`] facade with [`env_logger`] as the backend. The level passed
//! in applies to this crate only; setting `RUST_LOG` overrides it entirely:
//!
//! ```sh
//! $> RUST_LOG=ptable=debug,axum=info ptable
//! ```

/// Builds the filter string `env_logger` would read from `RUST_LOG`.
pub fn filter_for(level: &str) -> String {
    let level = match level.trim().to_lowercase().as_str() {
        "off" => "off",
        "error" => "error",
        "warn" | "warning" => "warn",
        "debug" => "debug",
        "trace" => "trace",
        _ => "info",
    };
    format!("{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Starts logging. Calling it again is a no-op.
pub fn init_logging(level: &str) {
    let filter = filter_for(level);
    let result = if std::env::var("RUST_LOG").is_err() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&filter))
            .try_init()
    } else {
        env_logger::try_init()
    };
    if result.is_ok() {
        log::debug!("logging started filter={filter}");
    }
}
