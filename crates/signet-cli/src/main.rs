//! `signet` — exercise a signet signing device over a serial channel.
//!
//! Runs one exchange: computes the SHA-256 digest of the fixed test
//! plaintext, sends the sign request, reads back the configured response
//! variant, and prints it.

mod config;

use std::path::PathBuf;

use clap::Parser;
use signet_host::run_exchange;
use signet_protocol::{DeviceStatus, ResponseKind};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::{CliError, ExchangeConfig, ResponseArg};

#[derive(Parser, Debug)]
#[command(name = "signet", version, about = "Exercise a signet signing device over a serial channel")]
struct Cli {
    /// Path to a YAML config file. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial device path (e.g. /dev/ttyUSB0).
    #[arg(long, conflicts_with = "tcp")]
    device: Option<String>,

    /// UART-over-TCP bridge address (e.g. 127.0.0.1:5000).
    #[arg(long)]
    tcp: Option<String>,

    /// Baud rate for serial endpoints.
    #[arg(long)]
    baud: Option<u32>,

    /// Which response the attached firmware variant sends.
    #[arg(long, value_enum)]
    response: Option<ResponseArg>,

    /// Read deadline in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn as_config(&self) -> ExchangeConfig {
        ExchangeConfig {
            device: self.device.clone(),
            tcp: self.tcp.clone(),
            baud: self.baud,
            response: self.response,
            timeout_ms: self.timeout_ms,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => ExchangeConfig::load(path)?,
        None => ExchangeConfig::default(),
    };
    let (options, kind) = cli.as_config().or(file).resolve()?;

    let response = run_exchange(&options, kind)?;
    print_response(kind, &response);
    Ok(())
}

/// Print the raw response: the acknowledgement as a hex byte with its
/// interpretation, the signature as a list of integer byte values.
fn print_response(kind: ResponseKind, response: &[u8]) {
    match kind {
        ResponseKind::Ack => {
            let status = DeviceStatus::from(response[0]);
            println!("ack: 0x{:02x} ({})", response[0], status);
        }
        ResponseKind::Signature => {
            debug!(signature = %hex::encode(response), "signature bytes");
            println!("{:?}", response);
        }
    }
}
