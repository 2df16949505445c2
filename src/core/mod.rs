pub mod bridge;
pub mod dispatcher;
pub mod monitor;

pub use crate::domain::model::{AlertMessage, DispatchOutcome, LineRead, SerialLine};
pub use crate::domain::ports::{AlertSink, Clock, LineSource, PortDiscovery, SourceOpener};
pub use crate::utils::error::Result;
pub use monitor::{MonitorReport, MonitorStats, StopReason};
