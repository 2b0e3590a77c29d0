use std::fmt;
use std::time::Duration;

use config::{Config, ConfigError, Environment, Map};
use serde::Deserialize;

/// Environment overrides, keyed by variable name. `None` reads the process
/// environment.
pub type EnvSource = Option<Map<String, String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: ConnectionConfig,
    pub probe: ProbeConfig,
}

/// Where to connect. Read from `DB_*` variables.
#[derive(Clone, Deserialize)]
pub struct ConnectionConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name (`DB_NAME`)
    #[serde(default = "default_database", rename = "name")]
    pub database: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_password")]
    pub password: String,
}

/// Retry behaviour. Read from `PROBE_*` variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Maximum connection attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed delay between failed attempts
    #[serde(default = "default_retry_delay")]
    pub retry_delay_seconds: u64,
    /// Upper bound on a single connection attempt
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_database() -> String {
    "testdb".to_string()
}

fn default_user() -> String {
    "testuser".to_string()
}

fn default_password() -> String {
    "testpass123".to_string()
}

fn default_max_retries() -> u32 {
    5
}

fn default_retry_delay() -> u64 {
    2
}

fn default_connect_timeout() -> u64 {
    10
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        Self::from_source(None)
    }

    pub fn from_source(source: EnvSource) -> Result<Self, ConfigError> {
        Ok(Self {
            database: ConnectionConfig::from_source(source.clone())?,
            probe: ProbeConfig::from_source(source)?,
        })
    }
}

impl ConnectionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(None)
    }

    /// Values are kept as strings (no `try_parsing`) so a numeric password
    /// such as `007` survives untouched.
    pub fn from_source(source: EnvSource) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("DB").source(source))
            .build()?
            .try_deserialize()
    }
}

impl ProbeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(None)
    }

    pub fn from_source(source: EnvSource) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Environment::with_prefix("PROBE").source(source))
            .build()?
            .try_deserialize()
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            user: default_user(),
            password: default_password(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

// Password is masked so the config can be logged freely.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}
