// GUI configuration: the window and the value fields it shows, from assets/config/default.json
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub version: String,
    pub window_title: String,
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FieldConfig {
    pub label: String,
    /// Currency code; the default currency when absent.
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub allow_negative: bool,
    #[serde(default = "default_show_currency")]
    pub show_currency: bool,
    #[serde(default)]
    pub precision: Option<u32>,
    /// Arrow key step; the edit's own default when absent.
    #[serde(default)]
    pub step: Option<f64>,
}

fn default_show_currency() -> bool {
    true
}

impl AppConfig {
    pub fn load_default() -> Result<Self, anyhow::Error> {
        let config_str = include_str!("../../assets/config/default.json"); // Path relative to this .rs file
        Self::from_json_str(config_str)
    }

    pub fn from_json_str(json: &str) -> Result<Self, anyhow::Error> {
        let config: AppConfig = serde_json::from_str(json)?;
        if config.fields.is_empty() {
            anyhow::bail!("GUI configuration {} defines no fields", config.version);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_loads() {
        let config = AppConfig::load_default().unwrap();
        assert_eq!(config.fields[0].label, "Amount");
        assert!(config.fields[0].allow_negative);
        assert!(config.fields[0].show_currency);
        assert_eq!(config.fields[1].currency.as_deref(), Some("USD"));
        assert!(!config.fields[3].show_currency);
        assert_eq!(config.fields[3].precision, Some(0));
        assert_eq!(config.fields[1].step, Some(0.5));
        assert_eq!(config.fields[0].step, None);
    }

    #[test]
    fn test_config_without_fields_is_rejected() {
        let json = r#"{ "version": "0", "window_title": "x", "fields": [] }"#;
        assert!(AppConfig::from_json_str(json).is_err());
    }
}
