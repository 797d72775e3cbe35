use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Which relational backend the execution gateway talks to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseKind {
    #[default]
    Mysql,
    Postgres,
}

impl DatabaseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseKind::Mysql => "mysql",
            DatabaseKind::Postgres => "postgres",
        }
    }

    /// Conventional port used when DB_PORT is not set
    pub fn default_port(&self) -> u16 {
        match self {
            DatabaseKind::Mysql => 3306,
            DatabaseKind::Postgres => 5432,
        }
    }
}

impl FromStr for DatabaseKind {
    type Err = UnknownDatabaseKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(DatabaseKind::Mysql),
            "postgres" | "postgresql" => Ok(DatabaseKind::Postgres),
            other => Err(UnknownDatabaseKind(other.to_string())),
        }
    }
}

#[derive(Error, Debug)]
#[error("unknown database kind `{0}` (expected `mysql` or `postgres`)")]
pub struct UnknownDatabaseKind(String);

/// Connection settings for the backing store
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub kind: DatabaseKind,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl DatabaseConfig {
    /// Read connection settings from DB_* environment variables.
    ///
    /// All variables have defaults so the server can start without a reachable
    /// database (query endpoints report the failure per request).
    pub fn from_env() -> Result<Self, ConfigError> {
        let kind: DatabaseKind = parse_env_var("DB_TYPE", "mysql")?;
        Ok(Self {
            kind,
            host: env::var("DB_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env_var("DB_PORT", &kind.default_port().to_string())?,
            user: env::var("DB_USER").unwrap_or_else(|_| "root".to_string()),
            password: env::var("DB_PASSWORD").unwrap_or_default(),
            database: env::var("DB_NAME").unwrap_or_default(),
        })
    }
}

/// Server configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// Path to the JSON schema document describing tables and foreign keys
    #[validate(length(min = 1, message = "Schema path cannot be empty"))]
    pub schema_path: String,

    /// Path of the JSON-lines audit log file
    #[validate(length(min = 1, message = "Audit log path cannot be empty"))]
    pub audit_log_path: String,

    /// Backing store connection settings
    pub database: DatabaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 3010,
            schema_path: "db-schema.json".to_string(),
            audit_log_path: "logs/app.log".to_string(),
            database: DatabaseConfig {
                kind: DatabaseKind::Mysql,
                host: "127.0.0.1".to_string(),
                port: 3306,
                user: "root".to_string(),
                password: String::new(),
                database: String::new(),
            },
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("RELQUERY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("RELQUERY_PORT", "3010")?,
            schema_path: env::var("SCHEMA_PATH").unwrap_or_else(|_| "db-schema.json".to_string()),
            audit_log_path: env::var("AUDIT_LOG_PATH")
                .unwrap_or_else(|_| "logs/app.log".to_string()),
            database: DatabaseConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation.
    ///
    /// CLI values override the environment; database settings always come from
    /// the environment (they carry credentials).
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = Self::from_env()?;
        config.http_host = cli.http_host;
        config.http_port = cli.http_port;
        if let Some(schema_path) = cli.schema_path {
            config.schema_path = schema_path;
        }
        if let Some(audit_log_path) = cli.audit_log_path {
            config.audit_log_path = audit_log_path;
        }

        config.validate()?;
        Ok(config)
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub http_host: String,
    pub http_port: u16,
    pub schema_path: Option<String>,
    pub audit_log_path: Option<String>,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
