use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, DashboardConfig, DataSettings, LoggingSettings};

/// Prefix for environment overrides, e.g. `VANTAGE__DATA__DIRECTORY=/srv/prices`.
pub const ENV_PREFIX: &str = "VANTAGE";

/// Loads the application configuration from `config.toml` in the working directory.
///
/// The file is optional: every setting has a built-in default, and environment
/// variables prefixed with `VANTAGE__` override both.
pub fn load_config() -> Result<Config, ConfigError> {
    build(config::File::with_name("config.toml").required(false))
}

/// Loads the application configuration from an explicit file, which must exist.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    build(config::File::from(path.as_ref()).required(true))
}

fn build<S>(file: S) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .set_default("data.directory", "data")?
        .set_default("data.benchmark_symbol", "^GSPC")?
        .set_default("dashboard.investment_amount", "1000")?
        .set_default("dashboard.start_date", "2017-12-22")?
        .set_default("dashboard.comparison_field", "close")?
        .set_default("dashboard.moving_average_field", "close")?
        .set_default("dashboard.moving_average_window", 10)?
        .set_default("logging.level", "info")?
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        data_dir = %config.data.directory.display(),
        benchmark = %config.data.benchmark_symbol,
        "Configuration loaded"
    );

    Ok(config)
}
