//! Configuration type definitions

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Delay before a held button starts repeating (milliseconds)
pub const DEFAULT_INITIAL_REPEAT_DELAY_MS: u32 = 200;

/// Interval between repeats while a button stays held (milliseconds)
pub const DEFAULT_REPEAT_DELAY_MS: u32 = 100;

/// Configuration validation error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A repeat delay of zero would repeat on every poll
    InvalidRepeatDelay,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidRepeatDelay => write!(f, "repeat delays must be non-zero"),
        }
    }
}

/// Button repeat timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct InputConfig {
    /// Hold time before the first repeat
    pub initial_repeat_delay_ms: u32,
    /// Time between subsequent repeats
    pub repeat_delay_ms: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            initial_repeat_delay_ms: DEFAULT_INITIAL_REPEAT_DELAY_MS,
            repeat_delay_ms: DEFAULT_REPEAT_DELAY_MS,
        }
    }
}

impl InputConfig {
    /// Check that both delays are non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_repeat_delay_ms == 0 || self.repeat_delay_ms == 0 {
            return Err(ConfigError::InvalidRepeatDelay);
        }
        Ok(())
    }
}

/// Screen settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct ScreenConfig {
    /// Drive the screen at all (buttons and lights work either way)
    pub enabled: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Complete front panel configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct PanelConfig {
    pub input: InputConfig,
    pub screen: ScreenConfig,
}

impl PanelConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.input.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PanelConfig::default();
        assert_eq!(config.input.initial_repeat_delay_ms, 200);
        assert_eq!(config.input.repeat_delay_ms, 100);
        assert!(config.screen.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_delay_rejected() {
        let mut config = PanelConfig::default();
        config.input.repeat_delay_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRepeatDelay));

        let mut config = PanelConfig::default();
        config.input.initial_repeat_delay_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidRepeatDelay));
    }
}
