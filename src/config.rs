use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::error::ConfigError;

pub const VERSION: &str = "0.1.0";
pub const DEFAULT_LOADING_DELAY_MS: u32 = 100;
pub const DEFAULT_HACK_STEP_DELAY_MS: u32 = 700;
pub const RICKROLL_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Cosmetic pause between submitting a line and showing its output.
    pub loading_delay_ms: u32,
    pub hack_step_delay_ms: u32,
    /// When set, `photography` opens this instead of printing a placeholder.
    pub photography_url: Option<String>,
    pub easter_egg_url: String,
    pub log_filter: String,
    pub user: String,
    pub host: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        TerminalConfig {
            loading_delay_ms: DEFAULT_LOADING_DELAY_MS,
            hack_step_delay_ms: DEFAULT_HACK_STEP_DELAY_MS,
            photography_url: None,
            easter_egg_url: RICKROLL_URL.into(),
            log_filter: "portfolio_terminal=info".into(),
            user: "guest".into(),
            host: "portfolio".into(),
        }
    }
}

impl TerminalConfig {
    /// Parse a partial JSON object; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TerminalConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.log_filter)
            .map(|_| ())
            .map_err(|_| ConfigError::LogFilter(self.log_filter.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TerminalConfig::from_json(r#"{"loading_delay_ms": 0}"#).unwrap();
        assert_eq!(config.loading_delay_ms, 0);
        assert_eq!(config.hack_step_delay_ms, DEFAULT_HACK_STEP_DELAY_MS);
        assert_eq!(config.easter_egg_url, RICKROLL_URL);
        assert!(config.photography_url.is_none());
    }

    #[test]
    fn test_photography_url() {
        let config =
            TerminalConfig::from_json(r#"{"photography_url": "https://photos.example.com"}"#).unwrap();
        assert_eq!(config.photography_url.as_deref(), Some("https://photos.example.com"));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(
            TerminalConfig::from_json("{not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            TerminalConfig::from_json(r#"{"loading_delay_ms": -1}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_bad_log_filter() {
        assert!(matches!(
            TerminalConfig::from_json(r#"{"log_filter": "portfolio_terminal=loud"}"#),
            Err(ConfigError::LogFilter(_))
        ));
    }
}
