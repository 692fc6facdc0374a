use crate::config::toml_config::{LogFormat, LoggingConfig};
use crate::utils::error::{LibraryError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter built from the configuration alone, ignoring `RUST_LOG`.
pub fn config_filter(verbose: bool, logging: &LoggingConfig) -> Result<EnvFilter> {
    let directive = if verbose {
        "small_library=debug,info".to_string()
    } else {
        format!("small_library={}", logging.level)
    };
    EnvFilter::try_new(&directive).map_err(|e| LibraryError::InvalidConfigValueError {
        field: "logging.level".to_string(),
        value: logging.level.clone(),
        reason: e.to_string(),
    })
}

/// Installs the global subscriber. Output goes to stderr so that log lines
/// never interleave with the menu on stdout. `RUST_LOG` wins over both the
/// configured level and `verbose`.
pub fn init_cli_logger(verbose: bool, logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => config_filter(verbose, logging)?,
    };

    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init(),
    }

    Ok(())
}
