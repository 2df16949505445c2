use crate::config::SerialSettings;
use crate::domain::model::{AlertMessage, LineRead};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Blocking pull of the next line; waits at most the source's read timeout.
pub trait LineSource: Send {
    fn next_line(&mut self) -> Result<LineRead>;
}

pub trait SourceOpener {
    type Source: LineSource;

    fn open(&self, device: &str, settings: &SerialSettings) -> Result<Self::Source>;
}

/// Picks the serial device to open.
pub trait PortDiscovery {
    fn discover(&self) -> Result<String>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, alert: &AlertMessage) -> Result<()>;
}
