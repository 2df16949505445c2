use crate::config::BridgeConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "beam-alert")]
#[command(about = "Emails a safety alert whenever the electric eye reports a beam interruption")]
pub struct CliArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Serial device path (skips auto-discovery)
    #[arg(short, long)]
    pub device: Option<String>,

    /// Must match the controller's Serial.begin() speed
    #[arg(long)]
    pub baud_rate: Option<u32>,

    #[arg(long)]
    pub relay_host: Option<String>,

    #[arg(long)]
    pub relay_port: Option<u16>,

    #[arg(long)]
    pub sender: Option<String>,

    #[arg(long)]
    pub recipient: Option<String>,

    /// Line that signals a beam interruption
    #[arg(long)]
    pub trigger: Option<String>,

    /// List serial ports and the one discovery would pick, then exit
    #[arg(long)]
    pub list_ports: bool,

    /// Send one alert without opening the serial port, then exit
    #[arg(long)]
    pub send_test_alert: bool,

    /// Log alerts instead of emailing them
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliArgs {
    /// Loads the file named by `--config` (or the defaults), then applies flag overrides.
    pub fn load_config(&self) -> Result<BridgeConfig> {
        let base = match &self.config {
            Some(path) => BridgeConfig::from_file(path)?,
            None => BridgeConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    pub fn apply_overrides(&self, mut config: BridgeConfig) -> BridgeConfig {
        if let Some(device) = &self.device {
            config.serial.device = Some(device.clone());
        }
        if let Some(baud_rate) = self.baud_rate {
            config.serial.baud_rate = baud_rate;
        }
        if let Some(host) = &self.relay_host {
            config.relay.host = host.clone();
        }
        if let Some(port) = self.relay_port {
            config.relay.port = port;
        }
        if let Some(sender) = &self.sender {
            config.alert.sender = sender.clone();
        }
        if let Some(recipient) = &self.recipient {
            config.alert.recipient = recipient.clone();
        }
        if let Some(trigger) = &self.trigger {
            config.alert.trigger_token = trigger.clone();
        }
        config
    }
}
