use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

fn default_backend() -> StoreBackend { StoreBackend::Postgres }
fn default_max_connections() -> u32 { 5 }
fn default_acquire_timeout() -> u64 { 3 }
fn default_weather_url() -> String { "https://www.metaweather.com".to_string() }
fn default_weather_timeout() -> u64 { 10 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `FLIGHTDESK__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("FLIGHTDESK").separator("__"));

        Self::from_builder(builder)
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        if config.database.backend == StoreBackend::Postgres && config.database.url.is_empty() {
            return Err(config::ConfigError::Message(
                "database.url is required for the postgres backend".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    fn parse(toml: &str) -> Result<Config, config::ConfigError> {
        Config::from_builder(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = parse(
            r#"
            [server]
            port = 3000

            [database]
            url = "postgres://flightdesk@localhost/flightdesk"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.backend, StoreBackend::Postgres);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.weather.base_url, "https://www.metaweather.com");
        assert_eq!(config.weather.timeout_seconds, 10);
    }

    #[test]
    fn test_memory_backend_needs_no_url() {
        let config = parse(
            r#"
            [server]
            port = 3000

            [database]
            backend = "memory"

            [weather]
            base_url = "http://localhost:9000"
            timeout_seconds = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.weather.base_url, "http://localhost:9000");
        assert_eq!(config.weather.timeout_seconds, 2);
    }

    #[test]
    fn test_postgres_backend_requires_url() {
        let result = parse(
            r#"
            [server]
            port = 3000

            [database]
            backend = "postgres"
            "#,
        );
        assert!(result.is_err());
    }
}
