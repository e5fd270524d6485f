use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod discover;
pub mod listen;
pub mod ping;
pub mod ports;
pub mod send;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send one framed message.
    Send(SendArgs),
    /// Print received messages until interrupted.
    Listen(ListenArgs),
    /// Ping a port and report the round trip.
    Ping(PingArgs),
    /// Probe candidate ports for a responding peer.
    Discover(DiscoverArgs),
    /// List detected serial devices.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Send(args) => send::run(args, format),
        Command::Listen(args) => listen::run(args, format),
        Command::Ping(args) => ping::run(args, format),
        Command::Discover(args) => discover::run(args, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// Command to send: ack, nak, ping, raw, 0x.. hex, or decimal.
    pub command: String,
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// Serial port, overriding `serial.port` from the config file.
    #[arg(long, short = 'p')]
    pub port: Option<String>,
    /// String payload (stdin is read when neither --string nor --hex is given).
    #[arg(long, short = 's', conflicts_with = "hex")]
    pub string: Option<String>,
    /// Hex payload, e.g. "01 02 0a" or "01020a".
    #[arg(long, short = 'x')]
    pub hex: Option<String>,
    /// Correlation id placed in the header.
    #[arg(long, default_value_t = 0)]
    pub id: u8,
    /// Wait for one response message and print it.
    #[arg(long)]
    pub wait: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// Serial port, overriding `serial.port` from the config file.
    #[arg(long, short = 'p')]
    pub port: Option<String>,
    /// Print raw frame bodies instead of parsed messages.
    #[arg(long)]
    pub raw: bool,
    /// Exit after receiving N frames.
    #[arg(long)]
    pub count: Option<usize>,
}

#[derive(Args, Debug)]
pub struct PingArgs {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// Serial port, overriding `serial.port` from the config file.
    #[arg(long, short = 'p')]
    pub port: Option<String>,
}

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Show extended build information.
    #[arg(long)]
    pub extended: bool,
}
