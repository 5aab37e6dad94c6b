//! Application configuration.
//!
//! Defaults, then an optional TOML file, then `STEWARD_*` environment
//! variables — the environment always wins. Secrets stay wrapped in
//! `SecretString` and never appear in Debug output or logs.

use std::env;
use std::fs;
use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("cannot parse config file {path}: {source}")]
    Parse { path: String, source: toml::de::Error },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub web: WebConfig,
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub remote_model: String,
    pub remote_base_url: String,
    pub local_enabled: bool,
    pub local_model: String,
    pub local_base_url: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
}

#[derive(Clone, Debug)]
pub struct WebConfig {
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
}

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    pub offline: bool,
    pub base_dir: PathBuf,
    pub data_dir: PathBuf,
    pub elevated_password: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig {
                api_key: None,
                remote_model: "llama-3.3-70b-versatile".to_string(),
                remote_base_url: "https://api.groq.com/openai/v1".to_string(),
                local_enabled: true,
                local_model: "llama3".to_string(),
                local_base_url: "http://127.0.0.1:11434".to_string(),
                timeout_secs: 30,
                max_tokens: 300,
            },
            web: WebConfig { timeout_secs: 10, cache_ttl_secs: 300 },
            runtime: RuntimeConfig {
                offline: false,
                base_dir: PathBuf::from("."),
                data_dir: PathBuf::from("data"),
                elevated_password: None,
            },
            logging: LoggingConfig { level: "info".to_string() },
        }
    }
}

/// File-side shape; every field optional so a partial file overlays cleanly.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    llm: Option<FileLlm>,
    web: Option<FileWeb>,
    runtime: Option<FileRuntime>,
    logging: Option<FileLogging>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLlm {
    remote_model: Option<String>,
    remote_base_url: Option<String>,
    local_enabled: Option<bool>,
    local_model: Option<String>,
    local_base_url: Option<String>,
    timeout_secs: Option<u64>,
    max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct FileWeb {
    timeout_secs: Option<u64>,
    cache_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct FileRuntime {
    offline: Option<bool>,
    base_dir: Option<String>,
    data_dir: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLogging {
    level: Option<String>,
}

impl AppConfig {
    /// Loads configuration: defaults, the file named by `STEWARD_CONFIG`
    /// (or `steward.toml` if present), then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file_path = env::var("STEWARD_CONFIG").ok().map(PathBuf::from).or_else(|| {
            let default = PathBuf::from("steward.toml");
            default.exists().then_some(default)
        });
        if let Some(path) = file_path {
            config.apply_file(&path)?;
        }
        config.apply_env()?;
        Ok(config)
    }

    fn apply_file(&mut self, path: &PathBuf) -> Result<(), ConfigError> {
        let display = path.display().to_string();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: display.clone(), source })?;
        let file: FileConfig = toml::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: display, source })?;

        if let Some(llm) = file.llm {
            overlay(&mut self.llm.remote_model, llm.remote_model);
            overlay(&mut self.llm.remote_base_url, llm.remote_base_url);
            overlay(&mut self.llm.local_enabled, llm.local_enabled);
            overlay(&mut self.llm.local_model, llm.local_model);
            overlay(&mut self.llm.local_base_url, llm.local_base_url);
            overlay(&mut self.llm.timeout_secs, llm.timeout_secs);
            overlay(&mut self.llm.max_tokens, llm.max_tokens);
        }
        if let Some(web) = file.web {
            overlay(&mut self.web.timeout_secs, web.timeout_secs);
            overlay(&mut self.web.cache_ttl_secs, web.cache_ttl_secs);
        }
        if let Some(runtime) = file.runtime {
            overlay(&mut self.runtime.offline, runtime.offline);
            if let Some(base_dir) = runtime.base_dir {
                self.runtime.base_dir = PathBuf::from(base_dir);
            }
            if let Some(data_dir) = runtime.data_dir {
                self.runtime.data_dir = PathBuf::from(data_dir);
            }
        }
        if let Some(logging) = file.logging {
            overlay(&mut self.logging.level, logging.level);
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = env::var("STEWARD_API_KEY") {
            if !key.trim().is_empty() {
                self.llm.api_key = Some(SecretString::from(key));
            }
        }
        if let Ok(model) = env::var("STEWARD_REMOTE_MODEL") {
            self.llm.remote_model = model;
        }
        if let Ok(url) = env::var("STEWARD_REMOTE_BASE_URL") {
            self.llm.remote_base_url = url;
        }
        if let Ok(value) = env::var("STEWARD_LOCAL_ENABLED") {
            self.llm.local_enabled = parse_bool("STEWARD_LOCAL_ENABLED", &value)?;
        }
        if let Ok(model) = env::var("STEWARD_LOCAL_MODEL") {
            self.llm.local_model = model;
        }
        if let Ok(url) = env::var("STEWARD_LOCAL_BASE_URL") {
            self.llm.local_base_url = url;
        }
        if let Ok(value) = env::var("STEWARD_OFFLINE") {
            self.runtime.offline = parse_bool("STEWARD_OFFLINE", &value)?;
        }
        if let Ok(dir) = env::var("STEWARD_BASE_DIR") {
            self.runtime.base_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("STEWARD_DATA_DIR") {
            self.runtime.data_dir = PathBuf::from(dir);
        }
        if let Ok(password) = env::var("STEWARD_ELEVATED_PASSWORD") {
            if !password.trim().is_empty() {
                self.runtime.elevated_password = Some(SecretString::from(password));
            }
        }
        if let Ok(value) = env::var("STEWARD_WEB_TIMEOUT_SECS") {
            self.web.timeout_secs = parse_u64("STEWARD_WEB_TIMEOUT_SECS", &value)?;
        }
        if let Ok(value) = env::var("STEWARD_WEB_CACHE_TTL_SECS") {
            self.web.cache_ttl_secs = parse_u64("STEWARD_WEB_CACHE_TTL_SECS", &value)?;
        }
        if let Ok(level) = env::var("STEWARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// Whether any generation provider can serve this session.
    pub fn model_available(&self) -> bool {
        self.llm.api_key.is_some() || self.llm.local_enabled
    }

    pub fn memory_path(&self) -> PathBuf {
        self.runtime.data_dir.join("memory.json")
    }

    pub fn elevated_state_path(&self) -> PathBuf {
        self.runtime.data_dir.join("elevated_state.json")
    }
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key: key.to_string(), value: value.to_string() }),
    }
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key: key.to_string(), value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::{parse_bool, AppConfig, ConfigError};

    #[test]
    fn defaults_are_online_with_local_provider() {
        let config = AppConfig::default();
        assert!(!config.runtime.offline);
        assert!(config.model_available());
        assert_eq!(config.web.timeout_secs, 10);
        assert_eq!(config.web.cache_ttl_secs, 300);
    }

    #[test]
    fn model_is_unavailable_without_any_provider() {
        let mut config = AppConfig::default();
        config.llm.local_enabled = false;
        config.llm.api_key = None;
        assert!(!config.model_available());
    }

    #[test]
    fn file_overlay_keeps_unset_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steward.toml");
        std::fs::write(&path, "[web]\ntimeout_secs = 3\n").unwrap();

        let mut config = AppConfig::default();
        config.apply_file(&path).unwrap();
        assert_eq!(config.web.timeout_secs, 3);
        assert_eq!(config.web.cache_ttl_secs, 300);
    }

    #[test]
    fn malformed_file_reports_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steward.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let mut config = AppConfig::default();
        assert!(matches!(config.apply_file(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn booleans_parse_the_usual_spellings() {
        assert!(parse_bool("K", "1").unwrap());
        assert!(parse_bool("K", "Yes").unwrap());
        assert!(!parse_bool("K", "off").unwrap());
        assert!(parse_bool("K", "definitely").is_err());
    }
}
