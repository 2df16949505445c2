#![allow(dead_code)]

use async_trait::async_trait;
use beam_alert::adapters::SerialLineReader;
use beam_alert::config::SerialSettings;
use beam_alert::core::{AlertMessage, AlertSink, Clock, LineRead, LineSource, SourceOpener};
use beam_alert::{BridgeError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

pub fn detection_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 9, 18)
        .unwrap()
        .and_hms_opt(15, 42, 0)
        .unwrap()
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Serves a fixed byte stream as if it came from the controller, counting the lines handed out.
pub struct MemoryOpener {
    pub bytes: Vec<u8>,
    pub lines_handed_out: Arc<AtomicUsize>,
}

impl MemoryOpener {
    pub fn new(lines: &[&str]) -> Self {
        let mut bytes = Vec::new();
        for line in lines {
            bytes.extend_from_slice(line.as_bytes());
            bytes.extend_from_slice(b"\r\n");
        }
        Self {
            bytes,
            lines_handed_out: Arc::new(AtomicUsize::new(0)),
        }
    }
}

pub struct CountingSource {
    inner: SerialLineReader<Cursor<Vec<u8>>>,
    lines_handed_out: Arc<AtomicUsize>,
}

impl LineSource for CountingSource {
    fn next_line(&mut self) -> Result<LineRead> {
        let read = self.inner.next_line()?;
        if matches!(read, LineRead::Line(_)) {
            self.lines_handed_out.fetch_add(1, Ordering::SeqCst);
        }
        Ok(read)
    }
}

impl SourceOpener for MemoryOpener {
    type Source = CountingSource;

    fn open(&self, device: &str, _settings: &SerialSettings) -> Result<CountingSource> {
        Ok(CountingSource {
            inner: SerialLineReader::new(Cursor::new(self.bytes.clone()), device),
            lines_handed_out: self.lines_handed_out.clone(),
        })
    }
}

/// Records every alert it receives along with how many lines had been read at that point.
#[derive(Clone, Default)]
pub struct RecordingSink {
    pub alerts: Arc<Mutex<Vec<AlertMessage>>>,
    pub lines_seen_at_delivery: Arc<Mutex<Vec<usize>>>,
    pub line_counter: Option<Arc<AtomicUsize>>,
    pub failures_before_success: Arc<AtomicUsize>,
}

impl RecordingSink {
    pub fn observing(counter: Arc<AtomicUsize>) -> Self {
        Self {
            line_counter: Some(counter),
            ..Default::default()
        }
    }

    pub fn failing_first(count: usize) -> Self {
        Self {
            failures_before_success: Arc::new(AtomicUsize::new(count)),
            ..Default::default()
        }
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

#[async_trait]
impl AlertSink for RecordingSink {
    async fn deliver(&self, alert: &AlertMessage) -> Result<()> {
        self.alerts.lock().unwrap().push(alert.clone());
        if let Some(counter) = &self.line_counter {
            self.lines_seen_at_delivery
                .lock()
                .unwrap()
                .push(counter.load(Ordering::SeqCst));
        }

        let remaining = self.failures_before_success.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_before_success.store(remaining - 1, Ordering::SeqCst);
            return Err(BridgeError::RelayUnreachable {
                relay: "relay.test:25".to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayBehavior {
    Accept,
    RejectRecipient,
    Silent,
}

/// Minimal SMTP responder for one connection; returns the client's commands and message lines.
pub struct FakeRelay {
    pub port: u16,
    handle: JoinHandle<Vec<String>>,
}

impl FakeRelay {
    pub fn start(behavior: RelayBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut transcript = Vec::new();

            if behavior == RelayBehavior::Silent {
                thread::sleep(Duration::from_secs(3));
                return transcript;
            }

            stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut writer = stream;
            let mut reply = |text: &str| {
                let _ = writer.write_all(format!("{}\r\n", text).as_bytes());
                let _ = writer.flush();
            };

            reply("220 relay.test ESMTP ready");
            let mut in_data = false;

            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                let line = line.trim_end_matches(['\r', '\n']).to_string();

                if in_data {
                    if line == "." {
                        in_data = false;
                        reply("250 2.0.0 queued");
                    } else {
                        transcript.push(line);
                    }
                    continue;
                }

                transcript.push(line.clone());
                let command = line.to_ascii_uppercase();

                if command.starts_with("EHLO") || command.starts_with("HELO") {
                    reply("250 relay.test");
                } else if command.starts_with("MAIL FROM") {
                    reply("250 2.1.0 sender ok");
                } else if command.starts_with("RCPT TO") {
                    if behavior == RelayBehavior::RejectRecipient {
                        reply("550 5.1.1 recipient unknown");
                    } else {
                        reply("250 2.1.5 recipient ok");
                    }
                } else if command == "DATA" {
                    in_data = true;
                    reply("354 end data with <CR><LF>.<CR><LF>");
                } else if command == "QUIT" {
                    reply("221 2.0.0 bye");
                    break;
                } else if command == "RSET" || command == "NOOP" {
                    reply("250 ok");
                } else {
                    reply("502 5.5.1 command not implemented");
                }
            }

            transcript
        });

        Self { port, handle }
    }

    pub fn transcript(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

/// A local port with nothing listening on it.
pub fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}
