use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSTORE_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSTORE_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSTORE";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay and
    /// `BOOKSTORE_*` variables.
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(&environment, &config_dir)
    }

    /// Load configuration for `environment` from `config_dir`, without reading `.env`.
    pub fn load_from(environment: &str, config_dir: &Path) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .with_list_parse_key("cors.allowed_origin_suffixes")
                    .try_parsing(true),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        // The selector variable wins over whatever the files say.
        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// Directory holding the sled database files
    #[serde(default = "DatabaseSettings::default_path")]
    pub path: PathBuf,
    /// Open a throwaway store that is removed when the handle drops
    #[serde(default)]
    pub temporary: bool,
    #[serde(default = "DatabaseSettings::default_flush_every_ms")]
    pub flush_every_ms: u64,
}

impl DatabaseSettings {
    fn default_path() -> PathBuf {
        PathBuf::from("data/bookstore")
    }

    fn default_flush_every_ms() -> u64 {
        500
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            temporary: false,
            flush_every_ms: Self::default_flush_every_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Cross-origin allow-list.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Origins accepted verbatim, e.g. `http://localhost:3000`
    #[serde(default = "CorsSettings::default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Host suffixes accepted for `https://` origins, e.g. `.app.github.dev`
    #[serde(default = "CorsSettings::default_allowed_origin_suffixes")]
    pub allowed_origin_suffixes: Vec<String>,
}

impl CorsSettings {
    fn default_allowed_origins() -> Vec<String> {
        vec!["http://localhost:3000".to_string()]
    }

    fn default_allowed_origin_suffixes() -> Vec<String> {
        vec![".app.github.dev".to_string()]
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: Self::default_allowed_origins(),
            allowed_origin_suffixes: Self::default_allowed_origin_suffixes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_server_listens_on_5000() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 5000);
        assert_eq!(settings.server.host, "0.0.0.0");
    }

    #[test]
    fn default_cors_allows_local_frontend() {
        let settings = Settings::default();
        assert_eq!(settings.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(settings.cors.allowed_origin_suffixes, vec![".app.github.dev"]);
    }

    #[test]
    fn files_are_layered_base_then_environment() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.toml"),
            "[server]\nport = 7000\nhost = \"127.0.0.1\"\n\n[telemetry]\nlog_format = \"json\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("staging.toml"), "[server]\nport = 7100\n").unwrap();

        let settings = Settings::load_from("staging", dir.path()).unwrap();
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.server.port, 7100);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
        assert_eq!(settings.database.path, PathBuf::from("data/bookstore"));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from("qa", dir.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }
}
