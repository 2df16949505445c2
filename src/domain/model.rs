use chrono::NaiveDateTime;

/// `HH:MM AM on MM/DD/YYYY`, 12-hour clock with a zero-padded hour.
pub const ALERT_TIME_FORMAT: &str = "%I:%M %p on %m/%d/%Y";

/// One decoded line from the controller, surrounding whitespace removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialLine(String);

impl SerialLine {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact, case-sensitive comparison against the trigger token.
    pub fn is_trigger(&self, token: &str) -> bool {
        self.0 == token
    }
}

impl std::fmt::Display for SerialLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one pull from a line source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRead {
    Line(SerialLine),
    /// Nothing complete arrived within the read timeout.
    Idle,
    /// The byte stream ended; no further lines will arrive on this connection.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub sender: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub detected_at: NaiveDateTime,
}

impl AlertMessage {
    pub fn compose(
        sender: &str,
        recipient: &str,
        subject: &str,
        detected_at: NaiveDateTime,
    ) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: safety_event_body(detected_at),
            detected_at,
        }
    }
}

pub fn format_alert_time(at: NaiveDateTime) -> String {
    at.format(ALERT_TIME_FORMAT).to_string()
}

pub fn safety_event_body(at: NaiveDateTime) -> String {
    format!("Critical Safety Event at {}", format_alert_time(at))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Delivered,
    Failed,
}
