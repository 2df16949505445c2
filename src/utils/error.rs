use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Could not open serial port {port}: {source}")]
    SerialOpenError {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial connection lost: {message}")]
    SerialLinkError { message: String },

    #[error("Line of {byte_count} bytes is not valid UTF-8: {source}")]
    DecodeError {
        byte_count: usize,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Line of {byte_count} bytes exceeds the {limit} byte limit")]
    LineTooLong { byte_count: usize, limit: usize },

    #[error("Mail relay {relay} unreachable: {message}")]
    RelayUnreachable { relay: String, message: String },

    #[error("Mail relay {relay} timed out: {message}")]
    RelayTimeout { relay: String, message: String },

    #[error("Recipient {recipient} refused: {message}")]
    RecipientRefused { recipient: String, message: String },

    #[error("Alert transmission failed: {message}")]
    TransmissionError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Transmission,
    Decode,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BridgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            BridgeError::SerialOpenError { .. } | BridgeError::SerialLinkError { .. } => {
                ErrorCategory::Connection
            }
            BridgeError::DecodeError { .. } | BridgeError::LineTooLong { .. } => {
                ErrorCategory::Decode
            }
            BridgeError::RelayUnreachable { .. }
            | BridgeError::RelayTimeout { .. }
            | BridgeError::RecipientRefused { .. }
            | BridgeError::TransmissionError { .. } => ErrorCategory::Transmission,
            BridgeError::ConfigError { .. }
            | BridgeError::ConfigValidationError { .. }
            | BridgeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            BridgeError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Decode => ErrorSeverity::Low,
            ErrorCategory::Transmission => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Connection | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Fatal errors end the monitor; everything else is reported and skipped.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Connection | ErrorCategory::Configuration | ErrorCategory::System
        )
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BridgeError::SerialOpenError { port, .. } => {
                format!("Could not open serial port {}", port)
            }
            BridgeError::SerialLinkError { .. } => {
                "Lost the serial connection to the sensor controller".to_string()
            }
            BridgeError::DecodeError { .. } => {
                "Received a garbled line from the sensor controller".to_string()
            }
            BridgeError::LineTooLong { limit, .. } => {
                format!("Dropped a line longer than {} bytes from the sensor controller", limit)
            }
            BridgeError::RelayUnreachable { relay, .. } => {
                format!("Unable to reach mail relay {}", relay)
            }
            BridgeError::RelayTimeout { relay, .. } => {
                format!("Mail relay {} did not answer in time", relay)
            }
            BridgeError::RecipientRefused { recipient, .. } => {
                format!("Mail relay refused recipient {}", recipient)
            }
            BridgeError::TransmissionError { .. } => "Unable to send the alert email".to_string(),
            BridgeError::IoError(e) => format!("System I/O failure: {}", e),
            _ => format!("{}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            BridgeError::SerialOpenError { .. } => {
                "Check that the controller is plugged in, the port name is correct and your user may access it (e.g. the dialout group)"
            }
            BridgeError::SerialLinkError { .. } => {
                "Reconnect the controller and restart the monitor"
            }
            BridgeError::DecodeError { .. } | BridgeError::LineTooLong { .. } => {
                "Check that the controller's baud rate matches the configured baud rate"
            }
            BridgeError::RelayUnreachable { .. } | BridgeError::RelayTimeout { .. } => {
                "Ensure this machine is on a network the relay accepts unauthenticated mail from"
            }
            BridgeError::RecipientRefused { .. } => {
                "Use a recipient address in a domain the relay delivers to"
            }
            BridgeError::TransmissionError { .. } => "Check the relay host, port and sender address",
            BridgeError::IoError(_) => "Check file permissions and available system resources",
            BridgeError::ConfigError { .. }
            | BridgeError::ConfigValidationError { .. }
            | BridgeError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and try again"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_drive_fatality() {
        let link = BridgeError::SerialLinkError {
            message: "device unplugged".to_string(),
        };
        assert_eq!(link.category(), ErrorCategory::Connection);
        assert!(link.is_fatal());

        let refused = BridgeError::RecipientRefused {
            recipient: "a@b.edu".to_string(),
            message: "550 no such user".to_string(),
        };
        assert_eq!(refused.category(), ErrorCategory::Transmission);
        assert_eq!(refused.severity(), ErrorSeverity::Medium);
        assert!(!refused.is_fatal());

        let bytes = vec![0xff, 0xfe];
        let decode = BridgeError::DecodeError {
            byte_count: bytes.len(),
            source: String::from_utf8(bytes).unwrap_err(),
        };
        assert_eq!(decode.severity(), ErrorSeverity::Low);
        assert!(!decode.is_fatal());

        let too_long = BridgeError::LineTooLong {
            byte_count: 4096,
            limit: 1024,
        };
        assert_eq!(too_long.category(), ErrorCategory::Decode);
        assert!(!too_long.is_fatal());
    }

    #[test]
    fn test_user_friendly_message_names_the_port() {
        let err = BridgeError::SerialOpenError {
            port: "/dev/ttyACM0".to_string(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "not found"),
        };
        assert!(err.user_friendly_message().contains("/dev/ttyACM0"));
        assert!(err.recovery_suggestion().contains("plugged in"));
    }
}
