use crate::utils::error::{BridgeError, Result};
use lettre::Address;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_email(field_name: &str, address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: "Email address cannot be empty".to_string(),
        });
    }

    address
        .parse::<Address>()
        .map(|_| ())
        .map_err(|e| BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: address.to_string(),
            reason: format!("Invalid email address: {}", e),
        })
}

pub fn validate_device_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Device path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Device path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(BridgeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alert.recipient", "safety-alerts@uiowa.edu").is_ok());
        assert!(validate_email("alert.recipient", "").is_err());
        assert!(validate_email("alert.recipient", "not-an-address").is_err());
    }

    #[test]
    fn test_validate_device_path() {
        assert!(validate_device_path("serial.device", "/dev/ttyUSB0").is_ok());
        assert!(validate_device_path("serial.device", "COM3").is_ok());
        assert!(validate_device_path("serial.device", "  ").is_err());
        assert!(validate_device_path("serial.device", "/dev/tty\0").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("serial.baud_rate", 9600u32, 300, 4_000_000).is_ok());
        assert!(validate_range("serial.baud_rate", 0u32, 300, 4_000_000).is_err());
        assert!(validate_positive_number("relay.port", 0, 1).is_err());
    }
}
