use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
    /// Commute calculator defaults handed to the client UI
    #[serde(default)]
    pub calculator: CalculatorConfig,
}

/// Defaults for the time calculator UI
#[derive(Debug, Clone, Deserialize)]
pub struct CalculatorConfig {
    /// Arrival time pre-filled when a routine has no default of its own (default: "09:00")
    #[serde(default = "CalculatorConfig::default_arrival_time")]
    pub default_arrival_time: String,
    /// Step size in minutes for free offset increment/decrement (default: 15)
    #[serde(default = "CalculatorConfig::default_offset_step_minutes")]
    pub offset_step_minutes: i64,
    /// Quick-select offset buttons, in minutes relative to the arrival time
    #[serde(default = "CalculatorConfig::default_preset_offsets")]
    pub preset_offsets: Vec<i64>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_arrival_time: Self::default_arrival_time(),
            offset_step_minutes: Self::default_offset_step_minutes(),
            preset_offsets: Self::default_preset_offsets(),
        }
    }
}

impl CalculatorConfig {
    fn default_arrival_time() -> String {
        "09:00".to_string()
    }
    fn default_offset_step_minutes() -> i64 {
        15
    }
    fn default_preset_offsets() -> Vec<i64> {
        vec![-60, -30, -15, 15, 30, 60]
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculator_section_defaults_when_absent() {
        let config: Config = serde_yaml::from_str("cors_permissive: true").unwrap();
        assert!(config.cors_permissive);
        assert_eq!(config.calculator.default_arrival_time, "09:00");
        assert_eq!(config.calculator.offset_step_minutes, 15);
        assert_eq!(config.calculator.preset_offsets, vec![-60, -30, -15, 15, 30, 60]);
    }

    #[test]
    fn calculator_section_overrides_are_honored() {
        let yaml = "calculator:\n  default_arrival_time: \"08:30\"\n  preset_offsets: [-15, 15]\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.calculator.default_arrival_time, "08:30");
        assert_eq!(config.calculator.preset_offsets, vec![-15, 15]);
        assert_eq!(config.calculator.offset_step_minutes, 15);
    }
}
