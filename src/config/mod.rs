// Conductor configuration - Tempo, time signature and clock calibration
// Stored as RON (preferred) or JSON

use crate::sequencer::{ConductorError, Tempo, TimeSignature};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("RON serialization error: {0}")]
    RonSerialize(#[from] ron::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConductorError),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Construction parameters of a conductor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConductorConfig {
    /// Tempo in quarter notes per minute
    pub bpm: f64,
    pub time_signature: TimeSignature,
    /// Calibration constant added to the clock reading (seconds)
    pub offset_seconds: f64,
}

impl ConductorConfig {
    /// Check values serde cannot enforce
    pub fn validate(&self) -> Result<(), ConductorError> {
        Tempo::new(self.bpm)?;
        self.time_signature.validate()
    }

    /// Parse and validate RON text
    pub fn from_ron_str(text: &str) -> ConfigResult<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON text
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.ron` or `.json` file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = match extension_of(path).as_str() {
            "ron" => Self::from_ron_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        log::info!(
            "Loaded conductor config from {:?}: {} BPM, {}",
            path,
            config.bpm,
            config.time_signature
        );
        Ok(config)
    }

    /// Write as pretty RON
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;
        let text = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?;
        fs::write(path, text)?;
        Ok(())
    }
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            bpm: 120.0,
            time_signature: TimeSignature::four_four(),
            offset_seconds: 0.0,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::NoteValue;

    #[test]
    fn test_default_config() {
        let config = ConductorConfig::default();
        assert_eq!(config.bpm, 120.0);
        assert_eq!(config.time_signature, TimeSignature::four_four());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_ron() {
        let text = r#"(
            bpm: 90.0,
            time_signature: (beats_per_measure: 6, beat_unit: Eighth),
            offset_seconds: -0.02,
        )"#;
        let config = ConductorConfig::from_ron_str(text).unwrap();
        assert_eq!(config.bpm, 90.0);
        assert_eq!(config.time_signature.beat_unit, NoteValue::Eighth);
        assert_eq!(config.offset_seconds, -0.02);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ConductorConfig::from_json_str(r#"{ "bpm": 140.0 }"#).unwrap();
        assert_eq!(config.bpm, 140.0);
        assert_eq!(config.time_signature, TimeSignature::four_four());
        assert_eq!(config.offset_seconds, 0.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = ConductorConfig::from_json_str(r#"{ "bpm": 0.0 }"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(ConductorError::InvalidTempo(_)))
        ));

        let result = ConductorConfig::from_ron_str(
            "(time_signature: (beats_per_measure: 0, beat_unit: Quarter))",
        );
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(ConductorError::InvalidTimeSignature(_)))
        ));
    }

    #[test]
    fn test_malformed_text() {
        assert!(matches!(
            ConductorConfig::from_ron_str("(bpm: "),
            Err(ConfigError::Ron(_))
        ));
        assert!(matches!(
            ConductorConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }
}
