use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config.toml or VANTAGE__* overrides: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid dashboard configuration: {0}")]
    ValidationError(String),
}
