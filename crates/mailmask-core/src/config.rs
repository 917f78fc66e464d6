//! Configuration types for mailmask.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Server configuration loaded from YAML file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Server settings
    pub server: ServerSettings,
    /// Injection (caller-side pass bookkeeping) settings
    pub injection: InjectionSettings,
}

impl ServerConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: ServerConfig =
            serde_yaml::from_str(yaml).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> crate::Result<()> {
        if self.server.max_pages == 0 {
            return Err(crate::Error::Config(
                "server.max_pages must be > 0".to_string(),
            ));
        }

        self.injection.validate()
    }
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Transport type (only stdio is served)
    pub transport: String,
    /// Maximum number of pages held open at once
    pub max_pages: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            transport: "stdio".to_string(),
            max_pages: 10,
            log_level: "info".to_string(),
        }
    }
}

/// Settings for the caller that runs detection passes and marks fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionSettings {
    /// Class token added to a field once it has been processed
    pub marker_class: String,
    /// Run a detection pass after each mutation batch
    pub observe_mutations: bool,
}

impl Default for InjectionSettings {
    fn default() -> Self {
        Self {
            marker_class: "mailmask-input-processed".to_string(),
            observe_mutations: true,
        }
    }
}

impl InjectionSettings {
    /// Validate the marker class is a single class token.
    pub fn validate(&self) -> crate::Result<()> {
        if self.marker_class.trim().is_empty() {
            return Err(crate::Error::Config(
                "injection.marker_class cannot be empty".to_string(),
            ));
        }

        if self.marker_class.chars().any(char::is_whitespace) {
            return Err(crate::Error::Config(format!(
                "injection.marker_class '{}' must be a single class token",
                self.marker_class
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.max_pages, 10);
        assert_eq!(config.injection.marker_class, "mailmask-input-processed");
        assert!(config.injection.observe_mutations);
    }

    #[test]
    fn test_config_validation() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_max_pages() {
        let mut config = ServerConfig::default();
        config.server.max_pages = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
server:
  transport: stdio
  max_pages: 4
  log_level: debug

injection:
  marker_class: relay-processed
  observe_mutations: false
"#;

        let config = ServerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.max_pages, 4);
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.injection.marker_class, "relay-processed");
        assert!(!config.injection.observe_mutations);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "server:\n  log_level: trace\n";
        let config = ServerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.server.log_level, "trace");
        assert_eq!(config.server.max_pages, 10);
        assert_eq!(config.injection.marker_class, "mailmask-input-processed");
    }

    #[test]
    fn test_malformed_yaml() {
        let result = ServerConfig::from_yaml("server: [unclosed");
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_empty_marker_class() {
        let settings = InjectionSettings {
            marker_class: "  ".to_string(),
            observe_mutations: true,
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_marker_class_with_whitespace() {
        let settings = InjectionSettings {
            marker_class: "two tokens".to_string(),
            observe_mutations: true,
        };
        assert!(settings.validate().is_err());
    }
}
