//! Configuration loading
//!
//! Reads the panel configuration from TOML:
//!
//! ```toml
//! [input]
//! initial_repeat_delay_ms = 200
//! repeat_delay_ms = 100
//!
//! [screen]
//! enabled = true
//! ```
//!
//! Missing sections and keys take their defaults.

use std::fmt;
use std::io;
use std::path::Path;

use frontpanel_core::config::{ConfigError as ValidationError, PanelConfig};

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// File could not be read
    Io,
    /// TOML syntax error or unknown key
    Parse,
    /// Values parsed but are out of range
    Invalid(ValidationError),
}

impl From<ValidationError> for ConfigError {
    fn from(e: ValidationError) -> Self {
        ConfigError::Invalid(e)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io => write!(f, "config file unreadable"),
            ConfigError::Parse => write!(f, "config parse failed"),
            ConfigError::Invalid(e) => write!(f, "invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse and validate configuration text
pub fn load_config(text: &str) -> Result<PanelConfig, ConfigError> {
    let config: PanelConfig = toml::from_str(text).map_err(|e| {
        warn!("Front panel config: {}", e.message());
        ConfigError::Parse
    })?;
    config.validate()?;
    debug!(
        "Front panel config: repeat {}/{} ms, screen enabled {}",
        config.input.initial_repeat_delay_ms,
        config.input.repeat_delay_ms,
        config.screen.enabled
    );
    Ok(config)
}

/// Read and parse a configuration file
pub fn load_config_file(path: &Path) -> Result<PanelConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| {
        debug!("Front panel config unreadable");
        ConfigError::Io
    })?;
    load_config(&text)
}

/// Load a configuration file, falling back to defaults
///
/// A missing file is expected and logged at info; any other failure is
/// logged as a warning.
pub fn load_or_default(path: &Path) -> PanelConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => match load_config(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!("Front panel config rejected ({}), using defaults", e);
                PanelConfig::default()
            }
        },
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No front panel config, using defaults");
            PanelConfig::default()
        }
        Err(_) => {
            warn!("Front panel config unreadable, using defaults");
            PanelConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = load_config(
            r#"
            [input]
            initial_repeat_delay_ms = 350
            repeat_delay_ms = 60

            [screen]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.input.initial_repeat_delay_ms, 350);
        assert_eq!(config.input.repeat_delay_ms, 60);
        assert!(!config.screen.enabled);
    }

    #[test]
    fn test_missing_keys_default() {
        let config = load_config("[input]\nrepeat_delay_ms = 80\n").unwrap();
        assert_eq!(config.input.initial_repeat_delay_ms, 200);
        assert_eq!(config.input.repeat_delay_ms, 80);
        assert!(config.screen.enabled);

        assert_eq!(load_config("").unwrap(), PanelConfig::default());
    }

    #[test]
    fn test_zero_delay_rejected() {
        assert_eq!(
            load_config("[input]\nrepeat_delay_ms = 0\n"),
            Err(ConfigError::Invalid(ValidationError::InvalidRepeatDelay))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(load_config("[input\n"), Err(ConfigError::Parse));
        assert_eq!(
            load_config("[input]\nrepeat_delay = 10\n"),
            Err(ConfigError::Parse)
        );
        assert_eq!(
            load_config("[input]\nrepeat_delay_ms = -5\n"),
            Err(ConfigError::Parse)
        );
    }

    #[test]
    fn test_missing_file_defaults() {
        let path = Path::new("/nonexistent/frontpanel.toml");
        assert_eq!(load_config_file(path), Err(ConfigError::Io));
        assert_eq!(load_or_default(path), PanelConfig::default());
    }
}
