use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    Config, DatabaseSettings, Endpoint, LogFormat, LoggingSettings, ServerEndpoint,
};

/// The file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Prefix of the environment variables that override file settings,
/// e.g. `GRADEBOOK__LOGGING__LEVEL=debug`.
pub const ENV_PREFIX: &str = "GRADEBOOK";

/// Loads the application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file
/// (`path`, or an optional `config.toml` in the working directory) and
/// `GRADEBOOK__*` environment variables. An explicit `path` must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    load(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn load(path: Option<&Path>, environment: config::Environment) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(environment)
        .build()?;

    // Missing sections fall back to `Config::default()` through `#[serde(default)]`.
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        candidates = config.database.candidates.len(),
        "Configuration loaded."
    );
    Ok(config)
}
