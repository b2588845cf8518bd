//! 配置系统
//! 默认值 + RBAC_ 前缀环境变量，数据库 URL 使用 Secret 包装

use config::{Config, ConfigError, Environment};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 2] = ["json", "pretty"];
const BACKENDS: [&str; 2] = ["postgres", "memory"];

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// host:port，端口为 0 时由系统分配
    pub addr: String,
}

/// 连接池参数（时间单位均为秒）
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// postgres 后端必填
    pub url: Secret<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// json（生产）或 pretty（开发）
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// postgres | memory
    pub backend: String,
}

impl StorageConfig {
    pub fn is_memory(&self) -> bool {
        self.backend.eq_ignore_ascii_case("memory")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedConfig {
    /// 启动时写入内置权限目录
    pub on_startup: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub seed: SeedConfig,
}

impl AppConfig {
    /// 加载配置，例如 RBAC_DATABASE__URL 对应 database.url
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: AppConfig = Config::builder()
            .set_default("server.addr", "0.0.0.0:3000")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("database.idle_timeout_secs", 600)?
            .set_default("database.max_lifetime_secs", 1800)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("storage.backend", "postgres")?
            .set_default("seed.on_startup", true)?
            .add_source(
                Environment::with_prefix("RBAC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.logging.validate()?;
        self.database.validate_pool()?;

        one_of("storage backend", &self.storage.backend, &BACKENDS)?;
        if !self.storage.is_memory() && self.database.url.expose_secret().trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url is required for the postgres backend".to_string(),
            ));
        }

        Ok(())
    }
}

impl ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let port = self
            .addr
            .rsplit_once(':')
            .and_then(|(_, port)| port.parse::<u16>().ok());

        match port {
            Some(port) if port != 0 && port < 1024 => Err(ConfigError::Message(format!(
                "Server port {} is privileged, use 0 or >= 1024",
                port
            ))),
            _ => Ok(()),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        one_of("log level", &self.level, &LOG_LEVELS)?;
        one_of("log format", &self.format, &LOG_FORMATS)
    }
}

impl DatabaseConfig {
    fn validate_pool(&self) -> Result<(), ConfigError> {
        if self.max_connections < self.min_connections {
            return Err(ConfigError::Message(format!(
                "database.max_connections ({}) is below min_connections ({})",
                self.max_connections, self.min_connections
            )));
        }
        Ok(())
    }
}

fn one_of(what: &str, value: &str, allowed: &[&str]) -> Result<(), ConfigError> {
    let value = value.to_lowercase();
    if allowed.contains(&value.as_str()) {
        Ok(())
    } else {
        Err(ConfigError::Message(format!(
            "Invalid {}: {}. Must be one of: {}",
            what,
            value,
            allowed.join(", ")
        )))
    }
}
