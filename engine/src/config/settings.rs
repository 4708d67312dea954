// Value edit settings, loaded from the configuration bundled with the binary
use serde::Deserialize;
use shared::NumberLocale;

use crate::error::EngineError;

pub const MAX_VALUE: f64 = 1_000_000_000_000.0;

#[derive(Debug, Deserialize, Clone)]
pub struct EditSettings {
    #[serde(default)]
    pub version: String,
    pub locale: NumberLocale,
    pub default_currency: String,
    pub default_precision: u32,
    pub max_value: f64,
}

impl EditSettings {
    pub fn load_default() -> Result<Self, anyhow::Error> {
        // Embedded so the binaries never need to find a config file at runtime
        let config_str = include_str!("../../assets/config/default.json");
        let settings = Self::from_json_str(config_str)?;
        Ok(settings)
    }

    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let settings: EditSettings = serde_json::from_str(json)
            .map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))?;
        if settings.max_value <= 0.0 || !settings.max_value.is_finite() {
            return Err(EngineError::ConfigError(format!(
                "max_value must be a positive finite number, got {}",
                settings.max_value
            )));
        }
        Ok(settings)
    }
}

impl Default for EditSettings {
    fn default() -> Self {
        // Same values as assets/config/default.json
        EditSettings {
            version: "1.0.0".to_string(),
            locale: NumberLocale::en_us(),
            default_currency: "EUR".to_string(),
            default_precision: 2,
            max_value: MAX_VALUE,
        }
    }
}
