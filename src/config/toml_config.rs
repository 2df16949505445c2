use crate::config::BridgeConfig;
use crate::utils::error::{BridgeError, Result};
use regex::{Captures, Regex};
use std::path::Path;

impl BridgeConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BridgeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Missing sections and keys fall back to the compiled-in defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BridgeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` (e.g. `${ALERT_RECIPIENT}`) with its environment value; unknown variables are left as written.
fn substitute_env_vars(content: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BridgeError::ConfigError {
        message: format!("Invalid substitution pattern: {}", e),
    })?;

    let result = re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_content = r#"
[serial]
device = "/dev/ttyUSB1"
baud_rate = 115200
max_line_bytes = 256

[alert]
trigger_token = "BEAM"
"#;

        let config = BridgeConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.serial.device.as_deref(), Some("/dev/ttyUSB1"));
        assert_eq!(config.serial.baud_rate, 115200);
        assert_eq!(config.serial.max_line_bytes, 256);
        assert_eq!(config.alert.trigger_token, "BEAM");
        assert_eq!(config.relay.port, 25);
        assert_eq!(config.alert.subject, "CRITICAL: Electric Eye Beam Interrupted");
        assert_eq!(config.monitor.poll_interval_ms, 10);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = BridgeConfig::from_toml_str("").unwrap();
        assert_eq!(config, BridgeConfig::default());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BEAM_ALERT_TEST_RECIPIENT", "lab-tech@uiowa.edu");

        let toml_content = r#"
[alert]
recipient = "${BEAM_ALERT_TEST_RECIPIENT}"
"#;

        let config = BridgeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.alert.recipient, "lab-tech@uiowa.edu");

        std::env::remove_var("BEAM_ALERT_TEST_RECIPIENT");
    }

    #[test]
    fn test_unknown_env_var_is_left_in_place() {
        let toml_content = r#"
[relay]
host = "${BEAM_ALERT_TEST_UNSET_HOST}"
"#;
        let config = BridgeConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.relay.host, "${BEAM_ALERT_TEST_UNSET_HOST}");
    }

    #[test]
    fn test_malformed_toml_is_a_config_error() {
        let result = BridgeConfig::from_toml_str("[relay\nport = 25");
        assert!(matches!(
            result,
            Err(BridgeError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[relay]
port = 0
"#;
        let config = BridgeConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[relay]
host = "smtp.lab.local"
port = 2525
timeout_seconds = 3
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = BridgeConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.relay.address(), "smtp.lab.local:2525");
        assert_eq!(config.relay.timeout_seconds, 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = BridgeConfig::from_file("/nonexistent/beam-alert.toml");
        assert!(matches!(result, Err(BridgeError::IoError(_))));
    }
}
