use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an absent `config.toml` still yields a
/// usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// Where the student table lives and how patiently to reach it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Tried in order at startup; the first that accepts a connection is used.
    pub candidates: Vec<Endpoint>,
    /// Upper bound on a single connection attempt.
    pub connect_timeout_secs: u64,
}

/// One connection target.
///
/// Either a full database URL (any backend sqlx understands, e.g.
/// `sqlite://grades.db`) or the parts of a MySQL server address.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Url { url: String },
    Server(ServerEndpoint),
}

/// A MySQL server address with credentials and schema name.
///
/// Unknown keys are rejected so a misspelt `host` cannot silently fall back
/// to the default address.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerEndpoint {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_database")]
    pub database: String,
}

/// Parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive such as `info` or `database=debug`.
    pub level: String,
    pub format: LogFormat,
    /// When set, logs are appended to `gradebook.log` in this directory
    /// instead of being written to stderr.
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum LogFormat {
    Full,
    #[default]
    Compact,
}

// --- Default Implementations ---
// The database defaults reproduce the local MySQL setups the tool was first
// used with: the standard port, two alternates and the `localhost` alias.

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_database() -> String {
    "grades_dashboard".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        let server = |host: &str, port: u16| {
            Endpoint::Server(ServerEndpoint {
                host: host.to_string(),
                port,
                user: default_user(),
                password: String::new(),
                database: default_database(),
            })
        };
        Self {
            candidates: vec![
                server("127.0.0.1", 3306),
                server("127.0.0.1", 3307),
                server("localhost", 3306),
                server("127.0.0.1", 3308),
            ],
            connect_timeout_secs: 5,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
            directory: None,
        }
    }
}

impl Config {
    /// Replaces the candidate list with a single URL endpoint.
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.candidates = vec![Endpoint::Url { url: url.into() }];
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }

    /// Rejects configurations that could never connect.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.candidates.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.candidates must list at least one endpoint".to_string(),
            ));
        }
        if self.database.connect_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "database.connect_timeout_secs must be positive".to_string(),
            ));
        }
        for (index, endpoint) in self.database.candidates.iter().enumerate() {
            match endpoint {
                Endpoint::Url { url } if url.trim().is_empty() => {
                    return Err(ConfigError::ValidationError(format!(
                        "database.candidates[{index}]: url is empty"
                    )));
                }
                Endpoint::Server(server)
                    if server.host.trim().is_empty() || server.database.trim().is_empty() =>
                {
                    return Err(ConfigError::ValidationError(format!(
                        "database.candidates[{index}]: host and database are required"
                    )));
                }
                Endpoint::Server(server) => {
                    server.url().map_err(|e| {
                        ConfigError::ValidationError(format!("database.candidates[{index}]: {e}"))
                    })?;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

impl DatabaseSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Endpoint {
    /// The connection URL handed to sqlx.
    pub fn url(&self) -> Result<String, ConfigError> {
        match self {
            Endpoint::Url { url } => Ok(url.clone()),
            Endpoint::Server(server) => server.url().map(String::from),
        }
    }

    /// A loggable description that never includes the password.
    pub fn describe(&self) -> String {
        match self {
            Endpoint::Url { url } => redact(url),
            Endpoint::Server(server) => format!("{}:{}", server.host, server.port),
        }
    }
}

impl ServerEndpoint {
    /// The address as a `mysql://` URL. User and password are percent-encoded,
    /// so any characters are allowed in them.
    pub fn url(&self) -> Result<Url, ConfigError> {
        let invalid =
            |part: &str| ConfigError::ValidationError(format!("{part} cannot be used in a MySQL URL"));

        let mut url = Url::parse("mysql://localhost").map_err(|_| invalid("scheme"))?;
        url.set_host(Some(self.host.as_str())).map_err(|_| invalid("host"))?;
        url.set_port(Some(self.port)).map_err(|_| invalid("port"))?;
        url.set_username(&self.user).map_err(|_| invalid("user"))?;
        if !self.password.is_empty() {
            url.set_password(Some(self.password.as_str()))
                .map_err(|_| invalid("password"))?;
        }
        url.path_segments_mut()
            .map_err(|_| invalid("database"))?
            .clear()
            .push(&self.database);
        Ok(url)
    }
}

/// Drops the userinfo of a URL. Unparsable URLs are reduced to their scheme.
fn redact(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if !url.username().is_empty() || url.password().is_some() => {
            // Both fail only for URLs without a host, which carry no userinfo.
            let _ = url.set_username("");
            let _ = url.set_password(None);
            url.to_string()
        }
        Ok(_) => raw.to_string(),
        Err(_) => match raw.split_once(':') {
            Some((scheme, _)) => format!("{scheme}://(unparsable address)"),
            None => "(unparsable address)".to_string(),
        },
    }
}
