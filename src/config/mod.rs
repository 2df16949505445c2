#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;

use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_TRIGGER_TOKEN: &str = "BLOCK";
pub const DEFAULT_RELAY_HOST: &str = "ns-mx.uiowa.edu";
pub const DEFAULT_RELAY_PORT: u16 = 25;
pub const DEFAULT_SENDER: &str = "ece4880lab2-system@uiowa.edu";
pub const DEFAULT_RECIPIENT: &str = "safety-alerts@uiowa.edu";
pub const DEFAULT_SUBJECT: &str = "CRITICAL: Electric Eye Beam Interrupted";

#[cfg(windows)]
pub const FALLBACK_DEVICE: &str = "COM3";
#[cfg(not(windows))]
pub const FALLBACK_DEVICE: &str = "/dev/ttyACM0";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub serial: SerialSettings,
    pub relay: RelaySettings,
    pub alert: AlertSettings,
    pub monitor: MonitorSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Explicit device path; when unset the port is auto-discovered.
    pub device: Option<String>,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
    /// Longer lines are dropped and reported; bounds memory when no newline ever arrives.
    pub max_line_bytes: usize,
    /// Substrings matched against port descriptions and paths during discovery.
    pub markers: Vec<String>,
    pub fallback_device: String,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            device: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: 1000,
            max_line_bytes: 1024,
            markers: ["Arduino", "USB Serial Device", "ACM", "USB"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            fallback_device: FALLBACK_DEVICE.to_string(),
        }
    }
}

impl SerialSettings {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_RELAY_HOST.to_string(),
            port: DEFAULT_RELAY_PORT,
            timeout_seconds: 10,
        }
    }
}

impl RelaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AlertSettings {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub trigger_token: String,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_string(),
            recipient: DEFAULT_RECIPIENT.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            trigger_token: DEFAULT_TRIGGER_TOKEN.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MonitorSettings {
    pub poll_interval_ms: u64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
        }
    }
}

impl MonitorSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Validate for BridgeConfig {
    fn validate(&self) -> Result<()> {
        if let Some(device) = &self.serial.device {
            validation::validate_device_path("serial.device", device)?;
        }
        validation::validate_device_path("serial.fallback_device", &self.serial.fallback_device)?;
        validation::validate_range("serial.baud_rate", self.serial.baud_rate, 300, 4_000_000)?;
        validation::validate_positive_number("serial.read_timeout_ms", self.serial.read_timeout_ms, 1)?;
        validation::validate_range("serial.max_line_bytes", self.serial.max_line_bytes, 16, 65_536)?;

        validation::validate_non_empty_string("relay.host", &self.relay.host)?;
        validation::validate_positive_number("relay.port", u64::from(self.relay.port), 1)?;
        validation::validate_positive_number("relay.timeout_seconds", self.relay.timeout_seconds, 1)?;

        validation::validate_email("alert.sender", &self.alert.sender)?;
        validation::validate_email("alert.recipient", &self.alert.recipient)?;
        validation::validate_non_empty_string("alert.subject", &self.alert.subject)?;
        validation::validate_non_empty_string("alert.trigger_token", &self.alert.trigger_token)?;

        validation::validate_range("monitor.poll_interval_ms", self.monitor.poll_interval_ms, 1, 1000)?;

        Ok(())
    }
}
