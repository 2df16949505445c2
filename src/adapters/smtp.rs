use crate::config::RelaySettings;
use crate::core::{AlertMessage, AlertSink};
use crate::utils::error::{BridgeError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Unauthenticated, unencrypted SMTP submission to a single relay.
///
/// Every delivery opens its own connection, submits one message for one
/// recipient and closes the connection again. There is no retry.
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    relay: String,
}

impl SmtpRelay {
    pub fn new(settings: &RelaySettings) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            .port(settings.port)
            .timeout(Some(settings.timeout()))
            .build();

        Ok(Self {
            transport,
            relay: settings.address(),
        })
    }

    pub fn relay(&self) -> &str {
        &self.relay
    }

    fn build_message(&self, alert: &AlertMessage) -> Result<Message> {
        let from = parse_mailbox(&alert.sender)?;
        let to = parse_mailbox(&alert.recipient)?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(alert.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| BridgeError::TransmissionError {
                message: format!("could not build message: {}", e),
            })
    }

    fn classify(&self, alert: &AlertMessage, error: smtp::Error) -> BridgeError {
        if error.is_timeout() {
            BridgeError::RelayTimeout {
                relay: self.relay.clone(),
                message: error.to_string(),
            }
        } else if error.is_permanent() {
            BridgeError::RecipientRefused {
                recipient: alert.recipient.clone(),
                message: error.to_string(),
            }
        } else if error.is_transient() {
            BridgeError::TransmissionError {
                message: error.to_string(),
            }
        } else {
            BridgeError::RelayUnreachable {
                relay: self.relay.clone(),
                message: error.to_string(),
            }
        }
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| BridgeError::TransmissionError {
            message: format!("invalid address '{}': {}", address, e),
        })
}

#[async_trait]
impl AlertSink for SmtpRelay {
    async fn deliver(&self, alert: &AlertMessage) -> Result<()> {
        let message = self.build_message(alert)?;

        tracing::info!("📡 Connecting to SMTP relay {}...", self.relay);
        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| self.classify(alert, e))?;

        tracing::debug!("Relay answered {:?}", response.code());
        Ok(())
    }
}

/// Logs the alert instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlySink;

#[async_trait]
impl AlertSink for LogOnlySink {
    async fn deliver(&self, alert: &AlertMessage) -> Result<()> {
        tracing::warn!(
            from = %alert.sender,
            to = %alert.recipient,
            subject = %alert.subject,
            "📝 DRY RUN - alert not sent: {}",
            alert.body
        );
        Ok(())
    }
}
