use crate::config::BridgeConfig;
use crate::core::dispatcher::AlertDispatcher;
use crate::core::monitor::{Monitor, MonitorReport};
use crate::core::{AlertSink, Clock, PortDiscovery, Result, SourceOpener};
use std::future::Future;

/// Startup sequence: discover the device, open it, build the sink, run the monitor.
///
/// The sink is only built once the serial port is open, so a missing device
/// never leads to a mail relay connection.
pub async fn run_bridge<D, O, S, C, B, F>(
    config: &BridgeConfig,
    discovery: &D,
    opener: &O,
    build_sink: B,
    clock: C,
    shutdown: F,
) -> Result<MonitorReport>
where
    D: PortDiscovery + ?Sized,
    O: SourceOpener,
    S: AlertSink,
    C: Clock,
    B: FnOnce(&BridgeConfig) -> Result<S>,
    F: Future<Output = ()>,
{
    let device = discovery.discover()?;
    tracing::info!(
        "🔌 Connecting to port {} at {} baud...",
        device,
        config.serial.baud_rate
    );

    let source = opener.open(&device, &config.serial)?;
    tracing::info!("✅ Serial connection established");

    let sink = build_sink(config)?;
    let dispatcher = AlertDispatcher::new(sink, clock, config.alert.clone());

    Monitor::new(source, dispatcher, config).run(shutdown).await
}
