//! CLI configuration.
//!
//! Options come from command-line flags and an optional YAML config file;
//! flags win field by field. The endpoint (serial path or TCP address) has
//! no default — exactly one must be configured somewhere.

use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;
use signet_host::{ChannelOptions, SessionError};
use signet_protocol::ResponseKind;
use thiserror::Error;

/// Errors from configuration or the exchange itself.
#[derive(Error, Debug)]
pub enum CliError {
    /// Config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    ConfigRead {
        /// The file that failed to load.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the expected schema.
    #[error("cannot parse config file {path}: {source}")]
    ConfigParse {
        /// The file that failed to parse.
        path: String,
        /// Underlying parse failure.
        #[source]
        source: serde_yaml::Error,
    },

    /// Neither a serial device nor a TCP address was configured.
    #[error("no device endpoint configured (use --device or --tcp)")]
    MissingEndpoint,

    /// Both a serial device and a TCP address were configured.
    #[error("both a serial device and a TCP address are configured; pick one")]
    AmbiguousEndpoint,

    /// The exchange failed.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Which response the attached firmware variant sends for a sign request.
///
/// The wire does not distinguish the variants; this is the caller-side
/// convention made explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseArg {
    /// One-byte acknowledgement.
    Ack,
    /// 512-byte signature buffer.
    Signature,
}

impl From<ResponseArg> for ResponseKind {
    fn from(arg: ResponseArg) -> Self {
        match arg {
            ResponseArg::Ack => ResponseKind::Ack,
            ResponseArg::Signature => ResponseKind::Signature,
        }
    }
}

/// The configurable fields, from either source.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeConfig {
    /// Serial device path, e.g. `/dev/ttyUSB0`.
    pub device: Option<String>,
    /// UART-over-TCP bridge address, e.g. `127.0.0.1:5000`.
    pub tcp: Option<String>,
    /// Baud rate for serial endpoints.
    pub baud: Option<u32>,
    /// Which response variant to expect.
    pub response: Option<ResponseArg>,
    /// Read deadline in milliseconds.
    pub timeout_ms: Option<u64>,
}

impl ExchangeConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path).map_err(|e| CliError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_yaml::from_str(&text).map_err(|e| CliError::ConfigParse {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Overlay `self` (flags) on top of `file`, field by field.
    pub fn or(self, file: ExchangeConfig) -> Self {
        ExchangeConfig {
            device: self.device.or(file.device),
            tcp: self.tcp.or(file.tcp),
            baud: self.baud.or(file.baud),
            response: self.response.or(file.response),
            timeout_ms: self.timeout_ms.or(file.timeout_ms),
        }
    }

    /// Resolve the merged fields into channel options and a response kind.
    pub fn resolve(self) -> Result<(ChannelOptions, ResponseKind), CliError> {
        let mut options = match (self.device, self.tcp) {
            (Some(path), None) => ChannelOptions::serial(path),
            (None, Some(addr)) => ChannelOptions::tcp(addr),
            (Some(_), Some(_)) => return Err(CliError::AmbiguousEndpoint),
            (None, None) => return Err(CliError::MissingEndpoint),
        };

        if let Some(baud) = self.baud {
            options = options.with_baud_rate(baud);
        }
        if let Some(ms) = self.timeout_ms {
            options = options.with_read_timeout(Duration::from_millis(ms));
        }

        // The acknowledgement variant is the default, matching the
        // smallest exchange the device supports.
        let kind = self.response.unwrap_or(ResponseArg::Ack).into();

        Ok((options, kind))
    }
}
