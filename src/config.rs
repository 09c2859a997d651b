use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    MySql,
    Sqlite,
}

/// Connection settings for the relational database.
///
/// For `Driver::Sqlite`, `database` is the file path (or `:memory:`) and the
/// network fields are ignored.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub driver: Driver,
    pub host: String,
    pub database: String,
    pub port: u16,
    pub charset: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: Driver::MySql,
            host: "localhost".to_string(),
            database: "pharmatrixdb".to_string(),
            port: 3306,
            charset: "utf8".to_string(),
            username: "root".to_string(),
            password: String::new(),
        }
    }
}

impl DatabaseConfig {
    /// SQLite database stored at `path`.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            driver: Driver::Sqlite,
            database: path.into(),
            ..Self::default()
        }
    }

    /// Connection URL understood by the sqlx `Any` driver.
    pub fn url(&self) -> String {
        match self.driver {
            Driver::Sqlite if self.database == ":memory:" => "sqlite::memory:".to_string(),
            // the driver percent-decodes the path, so `?`, `#` and `%` survive
            Driver::Sqlite => format!(
                "sqlite:{}?mode=rwc",
                urlencoding::encode(&self.database).replace("%2F", "/")
            ),
            Driver::MySql => {
                let credentials = if self.password.is_empty() {
                    urlencoding::encode(&self.username).into_owned()
                } else {
                    format!(
                        "{}:{}",
                        urlencoding::encode(&self.username),
                        urlencoding::encode(&self.password)
                    )
                };
                format!(
                    "mysql://{}@{}:{}/{}?charset={}",
                    credentials,
                    self.host,
                    self.port,
                    urlencoding::encode(&self.database),
                    urlencoding::encode(&self.charset)
                )
            }
        }
    }
}

// Keeps the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("port", &self.port)
            .field("charset", &self.charset)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = parse_port(&env_map, "PORT", 8080)?;
        let defaults = DatabaseConfig::default();

        let driver = match env_map
            .get("DB_DRIVER")
            .map(|s| s.as_str())
            .unwrap_or("mysql")
        {
            "mysql" => Driver::MySql,
            "sqlite" => Driver::Sqlite,
            other => {
                return Err(ConfigError::InvalidValue(
                    "DB_DRIVER".to_string(),
                    format!("must be mysql or sqlite, got {}", other),
                ))
            }
        };

        let database = env_map
            .get("DB_NAME")
            .cloned()
            .unwrap_or(defaults.database);
        if database.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "DB_NAME".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Config {
            port,
            database: DatabaseConfig {
                driver,
                host: env_map.get("DB_HOST").cloned().unwrap_or(defaults.host),
                database,
                port: parse_port(&env_map, "DB_PORT", defaults.port)?,
                charset: env_map
                    .get("DB_CHARSET")
                    .cloned()
                    .unwrap_or(defaults.charset),
                username: env_map.get("DB_USER").cloned().unwrap_or(defaults.username),
                password: env_map
                    .get("DB_PASSWORD")
                    .cloned()
                    .unwrap_or(defaults.password),
            },
        })
    }
}

fn parse_port(
    env_map: &HashMap<String, String>,
    key: &str,
    default: u16,
) -> Result<u16, ConfigError> {
    match env_map.get(key) {
        Some(raw) => raw.parse::<u16>().map_err(|_| {
            ConfigError::InvalidValue(key.to_string(), "must be a valid u16".to_string())
        }),
        None => Ok(default),
    }
}
