use crate::config::AlertSettings;
use crate::core::{AlertMessage, AlertSink, Clock, DispatchOutcome};

/// Composes the safety alert and makes exactly one delivery attempt per call.
pub struct AlertDispatcher<S: AlertSink, C: Clock> {
    sink: S,
    clock: C,
    settings: AlertSettings,
}

impl<S: AlertSink, C: Clock> AlertDispatcher<S, C> {
    pub fn new(sink: S, clock: C, settings: AlertSettings) -> Self {
        Self {
            sink,
            clock,
            settings,
        }
    }

    /// Reads the clock once; the message carries detection time, not send time.
    pub fn compose(&self) -> AlertMessage {
        AlertMessage::compose(
            &self.settings.sender,
            &self.settings.recipient,
            &self.settings.subject,
            self.clock.now(),
        )
    }

    pub async fn dispatch(&self) -> DispatchOutcome {
        let alert = self.compose();
        self.send(&alert).await
    }

    /// Failures are reported here and never propagate to the caller.
    pub async fn send(&self, alert: &AlertMessage) -> DispatchOutcome {
        match self.sink.deliver(alert).await {
            Ok(()) => {
                tracing::info!("✅ [ALERT] Email sent to {}: {}", alert.recipient, alert.body);
                DispatchOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(
                    "❌ [ERROR] {} (Category: {:?}, Severity: {:?})",
                    e,
                    e.category(),
                    e.severity()
                );
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                DispatchOutcome::Failed
            }
        }
    }
}
