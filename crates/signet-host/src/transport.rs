//! Concrete byte channels for reaching the device.
//!
//! The session layer only needs `write(bytes)` and blocking `read(n)`
//! semantics, so it is written against the [`Channel`] trait and can run
//! over any byte stream. Two transports are provided:
//!
//! - an OS serial port (the real device), and
//! - a TCP connection (a UART exposed on a socket by a simulator or a
//!   terminal server).

use std::fmt;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::error::SessionError;

/// Default baud rate for the device UART.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read deadline. Generous enough to cover the device's RSA-4096
/// signing time on an embedded core.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(2000);

/// A byte-stream channel to the device.
///
/// Blanket-implemented for anything that can read and write bytes, which
/// is what lets tests substitute an in-memory scripted stream.
pub trait Channel: Read + Write + Send {}

impl<T: Read + Write + Send + ?Sized> Channel for T {}

/// Where the device is reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// An OS serial device path, e.g. `/dev/ttyUSB0`.
    Serial(String),
    /// A `host:port` address of a UART-over-TCP bridge.
    Tcp(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Serial(path) => write!(f, "serial:{}", path),
            Endpoint::Tcp(addr) => write!(f, "tcp:{}", addr),
        }
    }
}

/// Structured channel configuration.
///
/// The line discipline is fixed at 8 data bits, no parity, 1 stop bit;
/// only the endpoint, baud rate, and read deadline vary.
#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// Where to reach the device.
    pub endpoint: Endpoint,
    /// Baud rate for serial endpoints. Ignored for TCP.
    pub baud_rate: u32,
    /// Deadline for blocking reads.
    pub read_timeout: Duration,
}

impl ChannelOptions {
    /// Options for a serial device path with default baud and timeout.
    pub fn serial(path: impl Into<String>) -> Self {
        ChannelOptions {
            endpoint: Endpoint::Serial(path.into()),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Options for a UART-over-TCP bridge address with default timeout.
    pub fn tcp(addr: impl Into<String>) -> Self {
        ChannelOptions {
            endpoint: Endpoint::Tcp(addr.into()),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    /// Set the baud rate.
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set the read deadline.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}

/// Open the channel described by `options`.
pub fn open_channel(options: &ChannelOptions) -> Result<Box<dyn Channel>, SessionError> {
    match &options.endpoint {
        Endpoint::Serial(path) => open_serial(path, options.baud_rate, options.read_timeout),
        Endpoint::Tcp(addr) => open_tcp(addr, options.read_timeout),
    }
}

/// Open an OS serial port at the given baud rate, 8N1.
fn open_serial(
    path: &str,
    baud_rate: u32,
    read_timeout: Duration,
) -> Result<Box<dyn Channel>, SessionError> {
    let port = serialport::new(path, baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .timeout(read_timeout)
        .open()
        .map_err(|e| match e.kind() {
            serialport::ErrorKind::InvalidInput => SessionError::ConfigurationError {
                endpoint: format!("serial:{}", path),
                reason: e.to_string(),
            },
            _ => SessionError::ChannelUnavailable {
                endpoint: format!("serial:{}", path),
                reason: e.to_string(),
            },
        })?;

    tracing::debug!(path, baud_rate, "opened serial port");
    Ok(Box::new(port))
}

/// Connect to a UART-over-TCP bridge.
fn open_tcp(addr: &str, read_timeout: Duration) -> Result<Box<dyn Channel>, SessionError> {
    let stream = TcpStream::connect(addr).map_err(|e| SessionError::ChannelUnavailable {
        endpoint: format!("tcp:{}", addr),
        reason: e.to_string(),
    })?;

    stream
        .set_read_timeout(Some(read_timeout))
        .and_then(|_| stream.set_nodelay(true))
        .map_err(|e| SessionError::ConfigurationError {
            endpoint: format!("tcp:{}", addr),
            reason: e.to_string(),
        })?;

    tracing::debug!(addr, "connected to UART bridge");
    Ok(Box::new(stream))
}
