use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    AnalyticsSettings, CalendarSettings, Config, InsightThresholds, LoggingSettings,
    StorageBackend, StorageSettings,
};

/// Prefix for environment overrides, e.g. `CYCLEBOOK__CALENDAR__WINDOW_SIZE=6`.
pub const ENV_PREFIX: &str = "CYCLEBOOK";

/// Loads the application configuration from `config.toml` (if present) and
/// `CYCLEBOOK__*` environment variables.
///
/// This function is the primary entry point for this crate. Every setting has a
/// default, so a missing file is not an error; the result is validated before
/// it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name("config").required(false))
}

/// Loads the configuration from an explicit file, which must exist.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    build(config::File::from(path).required(true))
}

fn build<S>(file: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
