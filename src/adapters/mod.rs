// Adapters layer: concrete implementations of the domain ports (serial, smtp, clock).

pub mod clock;
pub mod discovery;
pub mod serial;
pub mod smtp;

pub use clock::SystemClock;
pub use discovery::{discovery_for, FixedPort, PortCandidate, ScanDiscovery};
pub use serial::{SerialLineReader, SerialPortOpener};
pub use smtp::{LogOnlySink, SmtpRelay};
