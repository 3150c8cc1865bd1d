use crate::error::AppError;
use crate::scheduler::SchedulerConfig;
use crate::upstream::{ApiKey, Platform};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use crate::constants::{cache, env_vars};
use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Upstream credential. Read from the file or `RIOT_API_KEY`, never written back.
    #[serde(default, skip_serializing)]
    pub api_key: ApiKey,
    /// URL template for upstream hosts; `{host}` becomes a platform or cluster code.
    #[serde(default = "default_host_template")]
    pub host_template: String,
    /// Platform used when a request names none and does not probe.
    #[serde(default = "default_platform")]
    pub default_platform: Platform,
    /// Shards probed, in order, when locating a player.
    #[serde(default = "default_probe_order")]
    pub probe_order: Vec<Platform>,
    /// HTTP timeout in seconds for every upstream request. Defaults to 10 seconds.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    #[serde(default = "default_match_cache_ttl")]
    pub match_cache_ttl_seconds: u64,
    #[serde(default = "default_match_cache_capacity")]
    pub match_cache_capacity: usize,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Per-lane throttling and the retry budget.
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

fn default_host_template() -> String {
    crate::constants::DEFAULT_HOST_TEMPLATE.to_string()
}

fn default_platform() -> Platform {
    Platform::La1
}

fn default_probe_order() -> Vec<Platform> {
    Platform::DEFAULT_PROBE_ORDER.to_vec()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    crate::constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

fn default_match_cache_ttl() -> u64 {
    cache::MATCH_DETAIL_TTL_SECONDS
}

fn default_match_cache_capacity() -> usize {
    cache::MATCH_DETAIL_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: ApiKey::default(),
            host_template: default_host_template(),
            default_platform: default_platform(),
            probe_order: default_probe_order(),
            http_timeout_seconds: default_http_timeout(),
            match_cache_ttl_seconds: default_match_cache_ttl(),
            match_cache_capacity: default_match_cache_capacity(),
            log_file_path: None,
            scheduler: SchedulerConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location and validates it.
    ///
    /// # Environment Variables
    /// - `RIOT_API_KEY` - Upstream credential (required unless set in the file)
    /// - `RIFT_HOST_TEMPLATE` - Override the host template
    /// - `RIFT_HTTP_TIMEOUT` - Override HTTP timeout in seconds
    /// - `RIFT_LOG_FILE` - Override log file path
    /// - `RIFT_DEFAULT_PLATFORM` - Override the default platform
    ///
    /// # Notes
    /// - A missing config file means defaults
    /// - Environment variables take precedence over config file
    /// - Fails fast when the credential is absent
    pub async fn load() -> Result<Self, AppError> {
        let config = Self::read().await?;
        config.validate()?;
        Ok(config)
    }

    /// File plus environment overrides, without validation.
    pub async fn read() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Applies the `RIOT_API_KEY` and `RIFT_*` environment variables.
    pub fn apply_env_overrides(&mut self) -> Result<(), AppError> {
        if let Ok(key) = std::env::var(env_vars::API_KEY) {
            self.api_key = ApiKey::new(key);
        }

        if let Ok(template) = std::env::var(env_vars::HOST_TEMPLATE) {
            self.host_template = template;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(timeout) = std::env::var(env_vars::HTTP_TIMEOUT)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.http_timeout_seconds = timeout;
        }

        if let Ok(platform) = std::env::var(env_vars::DEFAULT_PLATFORM) {
            self.default_platform = platform.parse().map_err(|_| {
                AppError::config_error(format!(
                    "{} has unknown platform '{}'",
                    env_vars::DEFAULT_PLATFORM,
                    platform
                ))
            })?;
        }

        Ok(())
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// The credential is shown only as its trailing fragment.
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let config = Config::read().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        if Path::new(&config_path).exists() {
            println!("{config_path}");
        } else {
            println!("{config_path} (not found, using defaults)");
        }
        println!("────────────────────────────────────");
        println!("API Key:");
        if config.api_key.is_blank() {
            println!("(not set)");
        } else {
            println!("{}", config.api_key);
        }
        println!("────────────────────────────────────");
        println!("Host Template:");
        println!("{}", config.host_template);
        println!("────────────────────────────────────");
        println!("Default Platform:");
        println!("{}", config.default_platform);
        println!("────────────────────────────────────");
        println!("Probe Order:");
        let order: Vec<&str> = config.probe_order.iter().map(|p| p.code()).collect();
        println!("{}", order.join(", "));
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", config.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Match Cache:");
        println!(
            "{} entries, {} seconds TTL",
            config.match_cache_capacity, config.match_cache_ttl_seconds
        );
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/rift_aggregator.log");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist. The credential is not written.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a custom file path without environment overrides.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::LaneConfig;
    use serial_test::serial;
    use tempfile::tempdir;

    fn valid_config() -> Config {
        Config {
            api_key: ApiKey::new("RGAPI-config-test-123456"),
            ..Config::default()
        }
    }

    fn clear_env() {
        unsafe {
            std::env::remove_var(env_vars::API_KEY);
            std::env::remove_var(env_vars::HOST_TEMPLATE);
            std::env::remove_var(env_vars::HTTP_TIMEOUT);
            std::env::remove_var(env_vars::LOG_FILE);
            std::env::remove_var(env_vars::DEFAULT_PLATFORM);
        }
    }

    #[tokio::test]
    async fn test_config_load_existing_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
host_template = "http://127.0.0.1:9000/{host}"
default_platform = "euw1"
probe_order = ["euw1", "eun1"]
log_file_path = "/custom/log/path"

[scheduler]
max_retries = 5

[scheduler.match_detail]
max_concurrent = 2
min_interval_ms = 600
"#;
        tokio::fs::write(&config_path, config_content)
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.host_template, "http://127.0.0.1:9000/{host}");
        assert_eq!(config.default_platform, Platform::Euw1);
        assert_eq!(config.probe_order, vec![Platform::Euw1, Platform::Eun1]);
        assert_eq!(config.log_file_path, Some("/custom/log/path".to_string()));
        assert_eq!(config.scheduler.max_retries, 5);
        assert_eq!(config.scheduler.match_detail, LaneConfig::new(2, 600));
        assert_eq!(
            config.scheduler.match_id_listing,
            SchedulerConfig::default().match_id_listing
        );
        assert_eq!(config.http_timeout_seconds, default_http_timeout());
        assert!(config.api_key.is_blank());
    }

    #[tokio::test]
    async fn test_config_save_never_writes_the_key() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("rift_aggregator").join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config = valid_config();
        config.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let content = tokio::fs::read_to_string(&config_path).await.unwrap();
        assert!(!content.contains("RGAPI"));
        assert!(!content.contains("api_key"));
        assert!(content.contains("host_template"));

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(
            Config {
                api_key: config.api_key.clone(),
                ..loaded
            },
            config
        );
    }

    #[tokio::test]
    async fn test_config_load_invalid_toml() {
        let invalid_content = r#"
host_template = "https://{host}.example.com
"#;
        let result: Result<Config, _> = toml::from_str(invalid_content);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_platform_in_file_is_rejected() {
        let result: Result<Config, _> = toml::from_str(r#"default_platform = "atlantis""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_config_path() {
        let config_path = Config::get_config_path();
        assert!(config_path.contains("rift_aggregator"));
        assert!(config_path.ends_with("config.toml"));
    }

    #[test]
    fn test_get_log_dir_path() {
        let log_dir_path = Config::get_log_dir_path();
        assert!(log_dir_path.contains("rift_aggregator"));
        assert!(log_dir_path.ends_with("logs"));
    }

    #[test]
    fn test_validation_rules() {
        assert!(valid_config().validate().is_ok());

        let mut scheduler = SchedulerConfig::default();
        scheduler.general.max_concurrent = 0;

        let invalid_configs = vec![
            Config::default(),
            Config {
                host_template: "ftp://{host}.example.com".to_string(),
                ..valid_config()
            },
            Config {
                host_template: "https://la1.example.com".to_string(),
                ..valid_config()
            },
            Config {
                http_timeout_seconds: 0,
                ..valid_config()
            },
            Config {
                probe_order: Vec::new(),
                ..valid_config()
            },
            Config {
                scheduler,
                ..valid_config()
            },
            Config {
                log_file_path: Some(String::new()),
                ..valid_config()
            },
        ];

        for config in invalid_configs {
            assert!(
                config.validate().is_err(),
                "Config should be invalid: {config:?}"
            );
        }
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let debug = format!("{:?}", valid_config());
        assert!(!debug.contains("RGAPI-config"));
        assert!(debug.contains("123456"));
    }

    #[test]
    #[serial]
    fn test_environment_variable_override() {
        clear_env();
        unsafe {
            std::env::set_var(env_vars::API_KEY, "  RGAPI-from-env-abcdef  ");
            std::env::set_var(env_vars::HOST_TEMPLATE, "http://localhost:8080/{host}");
            std::env::set_var(env_vars::HTTP_TIMEOUT, "3");
            std::env::set_var(env_vars::DEFAULT_PLATFORM, "EUW");
        }

        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        clear_env();

        assert_eq!(config.api_key.fragment(), "abcdef");
        assert_eq!(config.host_template, "http://localhost:8080/{host}");
        assert_eq!(config.http_timeout_seconds, 3);
        assert_eq!(config.default_platform, Platform::Euw1);
        assert!(config.validate().is_ok());
    }

    #[test]
    #[serial]
    fn test_bad_environment_values() {
        clear_env();
        unsafe {
            std::env::set_var(env_vars::HTTP_TIMEOUT, "soon");
        }
        let mut config = Config::default();
        config.apply_env_overrides().unwrap();
        assert_eq!(config.http_timeout_seconds, default_http_timeout());

        unsafe {
            std::env::set_var(env_vars::DEFAULT_PLATFORM, "atlantis");
        }
        let result = Config::default().apply_env_overrides();
        clear_env();
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
