//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WWJS_*)
//! 2. TOML config file (if WWJS_CONFIG_FILE set)
//! 3. Built-in defaults

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Deployment environment.
///
/// Production hides upstream error details from clients and enforces the
/// CORS origin list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WWJS_*)
/// 2. TOML config file (if WWJS_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential for the upstream model provider.
    ///
    /// Set via WWJS_OPENAI_API_KEY environment variable.
    /// Required at startup; the server refuses to boot without it.
    #[serde(default)]
    pub openai_api_key: Option<String>,

    /// Upstream model identifier.
    ///
    /// Set via WWJS_OPENAI_MODEL environment variable.
    #[serde(default = "default_model")]
    pub openai_model: String,

    /// Base URL of the chat-completions API.
    ///
    /// Set via WWJS_OPENAI_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub openai_base_url: String,

    /// Outbound request timeout in milliseconds.
    ///
    /// Set via WWJS_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cap on generated tokens per analysis.
    ///
    /// Set via WWJS_MAX_OUTPUT_TOKENS environment variable.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Sampling temperature sent upstream.
    ///
    /// Set via WWJS_TEMPERATURE environment variable.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Listen host.
    ///
    /// Set via WWJS_HOST environment variable.
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port.
    ///
    /// Set via WWJS_PORT environment variable.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment.
    ///
    /// Set via WWJS_ENVIRONMENT environment variable (development|production).
    #[serde(default)]
    pub environment: Environment,

    /// Allowed CORS origins, `*` for any.
    ///
    /// Set via WWJS_ALLOWED_ORIGINS environment variable (comma-separated).
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: String,

    /// Rate limit window in milliseconds.
    ///
    /// Set via WWJS_RATE_LIMIT_WINDOW_MS environment variable.
    #[serde(default = "default_rate_limit_window_ms")]
    pub rate_limit_window_ms: u64,

    /// Requests allowed per client IP within one window.
    ///
    /// Set via WWJS_RATE_LIMIT_MAX_REQUESTS environment variable.
    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u32,

    /// Client IPs exempt from rate limiting.
    ///
    /// Set via WWJS_RATE_LIMIT_SKIP_IPS environment variable (comma-separated).
    #[serde(default)]
    pub rate_limit_skip_ips: String,
}

fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.7
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    3000
}

fn default_allowed_origins() -> String {
    "*".into()
}

fn default_rate_limit_window_ms() -> u64 {
    900_000 // 15 minutes
}

fn default_rate_limit_max_requests() -> u32 {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: default_model(),
            openai_base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            allowed_origins: default_allowed_origins(),
            rate_limit_window_ms: default_rate_limit_window_ms(),
            rate_limit_max_requests: default_rate_limit_max_requests(),
            rate_limit_skip_ips: String::new(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Rate limit window as Duration.
    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_millis(self.rate_limit_window_ms)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Allowed origins split on commas, trimmed, empties dropped.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect()
    }

    /// Rate-limit exemptions parsed from the comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if an entry is not an IP address.
    pub fn rate_limit_skip_ips(&self) -> Result<Vec<IpAddr>, ConfigError> {
        self.rate_limit_skip_ips
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|ip| {
                ip.parse().map_err(|_| ConfigError::Invalid {
                    field: "rate_limit_skip_ips".into(),
                    reason: format!("'{ip}' is not an IP address"),
                })
            })
            .collect()
    }

    /// Socket address the server binds to.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if host and port do not form a socket address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid { field: "host".into(), reason: format!("{e}") })
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WWJS_`
    /// 2. TOML file from `WWJS_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("WWJS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("WWJS_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the upstream API key, or fail startup if it is absent.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is unset or blank.
    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        self.openai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "openai_api_key".into(),
                hint: "Set WWJS_OPENAI_API_KEY environment variable".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.openai_base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.max_output_tokens, 300);
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.allowed_origins(), vec!["*".to_string()]);
        assert_eq!(config.rate_limit_window_ms, 900_000);
        assert_eq!(config.rate_limit_max_requests, 10);
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.rate_limit_window(), Duration::from_secs(15 * 60));
    }

    #[test]
    fn test_allowed_origins_split() {
        let config = AppConfig {
            allowed_origins: " https://a.com, ,https://b.com ,".into(),
            ..Default::default()
        };
        assert_eq!(config.allowed_origins(), vec!["https://a.com".to_string(), "https://b.com".to_string()]);
    }

    #[test]
    fn test_rate_limit_skip_ips() {
        assert!(AppConfig::default().rate_limit_skip_ips().unwrap().is_empty());

        let config = AppConfig { rate_limit_skip_ips: "10.0.0.1, ::1,".into(), ..Default::default() };
        let ips = config.rate_limit_skip_ips().unwrap();
        assert_eq!(ips, vec!["10.0.0.1".parse::<IpAddr>().unwrap(), "::1".parse::<IpAddr>().unwrap()]);

        let config = AppConfig { rate_limit_skip_ips: "10.0.0.1,localhost".into(), ..Default::default() };
        assert!(matches!(
            config.rate_limit_skip_ips(),
            Err(ConfigError::Invalid { field, .. }) if field == "rate_limit_skip_ips"
        ));
    }

    #[test]
    fn test_listen_addr() {
        let config = AppConfig { host: "127.0.0.1".into(), port: 8080, ..Default::default() };
        assert_eq!(config.listen_addr().unwrap().to_string(), "127.0.0.1:8080");

        let config = AppConfig { host: "not a host".into(), ..Default::default() };
        assert!(matches!(config.listen_addr(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_require_openai_api_key_missing() {
        let config = AppConfig::default();
        let result = config.require_openai_api_key();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_openai_api_key_blank() {
        let config = AppConfig { openai_api_key: Some("   ".into()), ..Default::default() };
        assert!(matches!(config.require_openai_api_key(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_openai_api_key_present() {
        let config = AppConfig { openai_api_key: Some("sk-test".into()), ..Default::default() };
        assert_eq!(config.require_openai_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_load_from_env() {
        Jail::expect_with(|jail| {
            jail.set_env("WWJS_OPENAI_API_KEY", "sk-env");
            jail.set_env("WWJS_OPENAI_MODEL", "gpt-4o");
            jail.set_env("WWJS_PORT", "8081");
            jail.set_env("WWJS_ENVIRONMENT", "production");
            jail.set_env("WWJS_ALLOWED_ORIGINS", "https://a.com,https://b.com");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.openai_api_key.as_deref(), Some("sk-env"));
            assert_eq!(config.openai_model, "gpt-4o");
            assert_eq!(config.port, 8081);
            assert!(config.is_production());
            assert_eq!(config.allowed_origins().len(), 2);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_toml_with_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "wwjs.toml",
                r#"
                openai_model = "from-file"
                rate_limit_max_requests = 25
                "#,
            )?;
            jail.set_env("WWJS_CONFIG_FILE", "wwjs.toml");
            jail.set_env("WWJS_OPENAI_MODEL", "from-env");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.openai_model, "from-env");
            assert_eq!(config.rate_limit_max_requests, 25);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("WWJS_TIMEOUT_MS", "5");
            let result = AppConfig::load();
            assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
            Ok(())
        });
    }
}
