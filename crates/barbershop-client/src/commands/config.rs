//! Configuration commands.

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dumps the effective configuration as TOML.
pub fn dump(config: &ClientConfig) -> ClientResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    Ok(format!(
        "# config.toml ({})\n{}",
        ClientConfig::default_path().display(),
        toml_str.trim_end()
    ))
}

/// Validates the configuration.
pub fn validate(config: &ClientConfig) -> ClientResult<String> {
    let api = config.api_config().map_err(ClientError::Config)?;

    if config.display.max_name_length == Some(0) {
        return Err(ClientError::Config(
            "display.max_name_length must be greater than zero".to_string(),
        ));
    }

    Ok(format!(
        "Configuration is valid.\nbackend: {}\nsession: {}",
        api.base_url,
        config.session_path().display()
    ))
}

/// Shows the configuration and session file paths.
pub fn path(config: &ClientConfig) -> ClientResult<String> {
    Ok(format!(
        "config: {}\nsession: {}",
        ClientConfig::default_path().display(),
        config.session_path().display()
    ))
}
