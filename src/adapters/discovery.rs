use crate::config::SerialSettings;
use crate::core::PortDiscovery;
use crate::utils::error::{BridgeError, Result};
use serialport::SerialPortType;

/// A serial port as seen during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    pub path: String,
    pub description: String,
}

/// Enumerates the ports the OS knows about, sorted by path.
pub fn system_ports() -> Result<Vec<PortCandidate>> {
    let ports = serialport::available_ports().map_err(|e| BridgeError::SerialLinkError {
        message: format!("failed to enumerate serial ports: {}", e),
    })?;

    let mut candidates: Vec<PortCandidate> = ports
        .into_iter()
        .map(|p| {
            let description = match p.port_type {
                SerialPortType::UsbPort(info) => {
                    let parts: Vec<String> = [info.manufacturer, info.product]
                        .into_iter()
                        .flatten()
                        .collect();
                    if parts.is_empty() {
                        format!("USB device {:04x}:{:04x}", info.vid, info.pid)
                    } else {
                        parts.join(" ")
                    }
                }
                SerialPortType::PciPort => "PCI serial".to_string(),
                SerialPortType::BluetoothPort => "Bluetooth serial".to_string(),
                SerialPortType::Unknown => "n/a".to_string(),
            };
            PortCandidate {
                path: p.port_name,
                description,
            }
        })
        .collect();

    candidates.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(candidates)
}

/// First candidate whose description or path contains any marker.
pub fn select_port<'a>(candidates: &'a [PortCandidate], markers: &[String]) -> Option<&'a PortCandidate> {
    candidates.iter().find(|candidate| {
        markers.iter().any(|marker| {
            candidate.description.contains(marker.as_str()) || candidate.path.contains(marker.as_str())
        })
    })
}

/// Best-effort scan; falls back to a fixed path and lets the open attempt fail if it is wrong.
pub struct ScanDiscovery {
    markers: Vec<String>,
    fallback: String,
    enumerate: fn() -> Result<Vec<PortCandidate>>,
}

impl ScanDiscovery {
    pub fn new(settings: &SerialSettings) -> Self {
        Self::with_enumerator(settings, system_ports)
    }

    pub fn with_enumerator(
        settings: &SerialSettings,
        enumerate: fn() -> Result<Vec<PortCandidate>>,
    ) -> Self {
        Self {
            markers: settings.markers.clone(),
            fallback: settings.fallback_device.clone(),
            enumerate,
        }
    }
}

impl PortDiscovery for ScanDiscovery {
    fn discover(&self) -> Result<String> {
        let candidates = match (self.enumerate)() {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("⚠️ {}", e);
                Vec::new()
            }
        };

        match select_port(&candidates, &self.markers) {
            Some(candidate) => {
                tracing::info!(
                    "🔍 Found potential controller port: {} ({})",
                    candidate.path,
                    candidate.description
                );
                Ok(candidate.path.clone())
            }
            None => {
                tracing::warn!(
                    "Could not automatically find a controller port, trying {}",
                    self.fallback
                );
                Ok(self.fallback.clone())
            }
        }
    }
}

/// A device path given in configuration.
#[derive(Debug, Clone)]
pub struct FixedPort(pub String);

impl PortDiscovery for FixedPort {
    fn discover(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

pub fn discovery_for(settings: &SerialSettings) -> Box<dyn PortDiscovery> {
    match &settings.device {
        Some(device) => Box::new(FixedPort(device.clone())),
        None => Box::new(ScanDiscovery::new(settings)),
    }
}

pub fn print_ports(settings: &SerialSettings) -> Result<()> {
    let ports = system_ports()?;

    if ports.is_empty() {
        println!("No serial ports found");
    } else {
        println!("Available serial ports:");
        for port in &ports {
            println!("  {}  ({})", port.path, port.description);
        }
    }

    match select_port(&ports, &settings.markers) {
        Some(port) => println!("Auto-discovery would use: {}", port.path),
        None => println!(
            "Auto-discovery found no match and would fall back to: {}",
            settings.fallback_device
        ),
    }

    Ok(())
}
