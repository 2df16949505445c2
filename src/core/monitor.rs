use crate::config::BridgeConfig;
use crate::core::dispatcher::AlertDispatcher;
use crate::core::{AlertSink, Clock, DispatchOutcome, LineRead, LineSource, Result, SerialLine};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorStats {
    /// Non-empty lines seen, triggers included.
    pub lines_read: u64,
    pub triggers: u64,
    pub alerts_delivered: u64,
    pub alerts_failed: u64,
    pub decode_errors: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Interrupted,
    StreamClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorReport {
    pub stats: MonitorStats,
    pub stop_reason: StopReason,
}

/// Single-threaded polling loop: pull one line, act on it, pause when idle.
///
/// The monitor owns the line source for its whole run, so the serial handle
/// is released when `run` returns, whichever way it returns.
pub struct Monitor<L: LineSource, S: AlertSink, C: Clock> {
    source: L,
    dispatcher: AlertDispatcher<S, C>,
    trigger_token: String,
    poll_interval: Duration,
    stats: MonitorStats,
}

impl<L: LineSource, S: AlertSink, C: Clock> Monitor<L, S, C> {
    pub fn new(source: L, dispatcher: AlertDispatcher<S, C>, config: &BridgeConfig) -> Self {
        Self {
            source,
            dispatcher,
            trigger_token: config.alert.trigger_token.clone(),
            poll_interval: config.monitor.poll_interval(),
            stats: MonitorStats::default(),
        }
    }

    /// Runs until `shutdown` resolves, the stream closes, or the link fails.
    ///
    /// Shutdown is only observed between iterations; an alert already being
    /// sent is allowed to finish.
    pub async fn run<F>(mut self, shutdown: F) -> Result<MonitorReport>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        tracing::info!(
            "👀 Serial monitor active, waiting for '{}'",
            self.trigger_token
        );

        // nothing pending yet; shutdown is checked before the first read
        let mut pause = None;
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("🛑 Monitor stopped by user");
                    return Ok(self.report(StopReason::Interrupted));
                }
                _ = suspend(pause) => {}
            }

            pause = match self.source.next_line() {
                Ok(LineRead::Line(line)) => {
                    self.handle_line(line).await;
                    None
                }
                Ok(LineRead::Idle) => Some(self.poll_interval),
                Ok(LineRead::Closed) => {
                    tracing::warn!("Serial stream closed by the device");
                    return Ok(self.report(StopReason::StreamClosed));
                }
                Err(e) if e.is_fatal() => {
                    tracing::error!("❌ {}", e);
                    return Err(e);
                }
                Err(e) => {
                    self.stats.decode_errors += 1;
                    tracing::warn!("⚠️ Skipping line: {}", e);
                    None
                }
            };
        }
    }

    async fn handle_line(&mut self, line: SerialLine) {
        if line.is_empty() {
            return;
        }
        self.stats.lines_read += 1;

        if line.is_trigger(&self.trigger_token) {
            self.stats.triggers += 1;
            tracing::warn!("📢 CRITICAL EVENT DETECTED! Triggering alert");
            match self.dispatcher.dispatch().await {
                DispatchOutcome::Delivered => self.stats.alerts_delivered += 1,
                DispatchOutcome::Failed => self.stats.alerts_failed += 1,
            }
        }

        tracing::info!("[controller]: {}", line);
    }

    fn report(&self, stop_reason: StopReason) -> MonitorReport {
        MonitorReport {
            stats: self.stats,
            stop_reason,
        }
    }
}

async fn suspend(pause: Option<Duration>) {
    match pause {
        Some(interval) => tokio::time::sleep(interval).await,
        None => tokio::task::yield_now().await,
    }
}
