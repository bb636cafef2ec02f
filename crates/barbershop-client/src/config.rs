//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/barbershop/config.toml` by default. Command-line flags take
//! precedence over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use barbershop_api::{ApiConfig, DEFAULT_BASE_URL};
use barbershop_core::tracing::TracingConfig;
use serde::{Deserialize, Serialize};

/// Configuration for the barbershop client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Log every normalization fallback as JSON lines on stderr.
    pub trace: bool,

    /// Explicit log filter, e.g. `barbershop_core::json=trace`.
    pub log_filter: Option<String>,

    /// Backend connection settings.
    #[serde(default)]
    pub api: ApiSettings,

    /// Session persistence settings.
    #[serde(default)]
    pub session: SessionSettings,

    /// Display settings.
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Base URL of the booking backend.
    pub base_url: String,

    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
        }
    }
}

/// Session persistence settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Where the login session is stored.
    pub path: Option<PathBuf>,
}

/// Display settings for terminal output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Maximum barber/service name length (truncated with ellipsis).
    pub max_name_length: Option<usize>,

    /// Text to show when a day has no free slots.
    pub no_slots_text: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_name_length: None,
            no_slots_text: "Nenhum horário disponível".to_string(),
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Builds the HTTP client settings.
    pub fn api_config(&self) -> Result<ApiConfig, String> {
        if self.api.timeout == 0 {
            return Err("api.timeout must be greater than zero".to_string());
        }
        let config = ApiConfig::new(&self.api.base_url).map_err(|e| e.message().to_string())?;
        Ok(config.with_timeout(Duration::from_secs(self.api.timeout)))
    }

    /// Picks the log preset: `trace` wins over `debug`.
    pub fn tracing_config(&self) -> TracingConfig {
        let config = if self.trace {
            TracingConfig::diagnostics()
        } else if self.debug {
            TracingConfig::cli_debug()
        } else {
            TracingConfig::cli()
        };
        match self.log_filter {
            Some(ref filter) => config.with_env_filter(filter),
            None => config,
        }
    }

    /// Returns where the session file lives.
    pub fn session_path(&self) -> PathBuf {
        self.session
            .path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join("session.json"))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("barbershop")
    }

    /// Returns the default data directory path.
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("barbershop")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert!(!config.debug);
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout, 30);
        assert!(config.session.path.is_none());
        assert_eq!(config.display.no_slots_text, "Nenhum horário disponível");
    }

    #[test]
    fn partial_sections() {
        let config: ClientConfig = toml::from_str(
            r#"
debug = true

[api]
base_url = "https://agenda.example.com/api"

[display]
max_name_length = 12
"#,
        )
        .unwrap();

        assert!(config.debug);
        assert_eq!(config.api.base_url, "https://agenda.example.com/api");
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.display.max_name_length, Some(12));
        assert_eq!(config.display.no_slots_text, "Nenhum horário disponível");

        let api = config.api_config().unwrap();
        assert_eq!(
            api.endpoint_url("/services").unwrap().as_str(),
            "https://agenda.example.com/api/services"
        );
    }

    #[test]
    fn api_config_rejects_zero_timeout() {
        let mut config = ClientConfig::default();
        config.api.timeout = 0;
        assert!(config.api_config().unwrap_err().contains("timeout"));
    }

    #[test]
    fn api_config_rejects_bad_url() {
        let mut config = ClientConfig::default();
        config.api.base_url = "localhost".to_string();
        assert!(config.api_config().is_err());
    }

    mod logging {
        use super::*;
        use barbershop_core::tracing::TracingOutputFormat;
        use tracing::Level;

        #[test]
        fn quiet_by_default() {
            let config = ClientConfig::default();
            assert!(!config.trace);
            assert_eq!(config.tracing_config(), TracingConfig::cli());
        }

        #[test]
        fn debug_selects_cli_debug() {
            let config = ClientConfig {
                debug: true,
                ..Default::default()
            };
            assert_eq!(config.tracing_config().level, Level::DEBUG);
        }

        #[test]
        fn trace_wins_over_debug() {
            let config = ClientConfig {
                debug: true,
                trace: true,
                ..Default::default()
            };
            let tracing = config.tracing_config();
            assert_eq!(tracing, TracingConfig::diagnostics());
            assert_eq!(tracing.output_format, TracingOutputFormat::Json);
        }

        #[test]
        fn log_filter_from_file() {
            let config: ClientConfig =
                toml::from_str("trace = true\nlog_filter = \"barbershop_core::slots=trace\"\n")
                    .unwrap();
            let tracing = config.tracing_config();
            assert_eq!(tracing.level, Level::TRACE);
            assert_eq!(tracing.env_filter.as_deref(), Some("barbershop_core::slots=trace"));
        }
    }

    #[test]
    fn session_path_override() {
        let mut config = ClientConfig::default();
        assert!(config.session_path().ends_with("barbershop/session.json"));

        config.session.path = Some(PathBuf::from("/tmp/s.json"));
        assert_eq!(config.session_path(), PathBuf::from("/tmp/s.json"));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api]\ntimeout = 5\n").unwrap();

        let config = ClientConfig::load_from(&path).unwrap();
        assert_eq!(config.api.timeout, 5);

        let err = ClientConfig::load_from(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.contains("failed to read config"));
    }
}
