pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;
pub use config::BridgeConfig;

pub use crate::core::{
    bridge::run_bridge,
    dispatcher::AlertDispatcher,
    monitor::{Monitor, MonitorReport, MonitorStats, StopReason},
};
pub use utils::error::{BridgeError, Result};
