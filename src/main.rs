use beam_alert::adapters::discovery::{self, discovery_for};
use beam_alert::adapters::{LogOnlySink, SerialPortOpener, SmtpRelay, SystemClock};
use beam_alert::core::{AlertSink, DispatchOutcome};
use beam_alert::utils::{logger, validation::Validate};
use beam_alert::{run_bridge, AlertDispatcher, BridgeConfig, BridgeError, CliArgs, StopReason};
use clap::Parser;
use std::future::Future;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting beam-alert");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => exit_with(&e, 1),
    };
    if args.verbose {
        tracing::debug!("Effective config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e, 1);
    }

    if args.list_ports {
        discovery::print_ports(&config.serial)?;
        return Ok(());
    }

    if args.send_test_alert {
        let outcome = if args.dry_run {
            send_test_alert(LogOnlySink, &config).await
        } else {
            match SmtpRelay::new(&config.relay) {
                Ok(relay) => send_test_alert(relay, &config).await,
                Err(e) => exit_with(&e, 1),
            }
        };
        if outcome == DispatchOutcome::Failed {
            std::process::exit(2);
        }
        return Ok(());
    }

    // installed before discovery so an early Ctrl-C is not lost
    let shutdown = interrupt_listener()?;
    let discovery = discovery_for(&config.serial);

    let result = if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - alerts will be logged, not emailed");
        run_bridge(
            &config,
            discovery.as_ref(),
            &SerialPortOpener,
            |_| Ok(LogOnlySink),
            SystemClock,
            shutdown,
        )
        .await
    } else {
        run_bridge(
            &config,
            discovery.as_ref(),
            &SerialPortOpener,
            |config| SmtpRelay::new(&config.relay),
            SystemClock,
            shutdown,
        )
        .await
    };

    match result {
        Ok(report) => {
            let stats = report.stats;
            tracing::info!(
                "📊 Lines: {}, triggers: {}, alerts sent: {}, failed: {}, undecodable: {}",
                stats.lines_read,
                stats.triggers,
                stats.alerts_delivered,
                stats.alerts_failed,
                stats.decode_errors
            );
            if report.stop_reason == StopReason::StreamClosed {
                println!("Serial stream closed, monitor exiting.");
            } else {
                println!("Monitor stopped by user.");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Monitor failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(&e, 1)
        }
    }
}

async fn send_test_alert<S: AlertSink>(sink: S, config: &BridgeConfig) -> DispatchOutcome {
    tracing::info!("🧪 Simulating a beam interruption event...");
    let dispatcher = AlertDispatcher::new(sink, SystemClock, config.alert.clone());
    dispatcher.dispatch().await
}

#[cfg(unix)]
fn interrupt_listener() -> std::io::Result<impl Future<Output = ()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())?;
    Ok(async move {
        interrupt.recv().await;
    })
}

#[cfg(windows)]
fn interrupt_listener() -> std::io::Result<impl Future<Output = ()>> {
    let mut ctrl_c = tokio::signal::windows::ctrl_c()?;
    Ok(async move {
        ctrl_c.recv().await;
    })
}

fn exit_with(error: &BridgeError, code: i32) -> ! {
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());
    std::process::exit(code);
}
