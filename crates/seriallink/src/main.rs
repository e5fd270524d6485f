mod cmd;
mod config;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "seriallink", version, about = "HDLC-framed serial messaging CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_send_subcommand() {
        let cli = Cli::try_parse_from([
            "seriallink",
            "send",
            "ping",
            "--port",
            "/dev/ttyUSB0",
            "--string",
            "hello",
        ])
        .expect("send args should parse");

        assert!(matches!(cli.command, Command::Send(_)));
    }

    #[test]
    fn rejects_conflicting_payload_args() {
        let err = Cli::try_parse_from([
            "seriallink",
            "send",
            "ping",
            "--string",
            "hello",
            "--hex",
            "0102",
        ])
        .expect_err("conflicting args should fail");

        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parses_discover_subcommand() {
        let cli = Cli::try_parse_from(["seriallink", "discover", "--config", "other.toml"])
            .expect("discover args should parse");
        assert!(matches!(cli.command, Command::Discover(_)));
    }

    #[test]
    fn parses_ping_with_port_override() {
        let cli = Cli::try_parse_from(["seriallink", "ping", "--port", "COM7"])
            .expect("ping args should parse");
        let Command::Ping(args) = cli.command else {
            panic!("expected ping");
        };
        assert_eq!(args.port.as_deref(), Some("COM7"));
    }

    #[test]
    fn global_format_flag_accepted_after_subcommand() {
        let cli = Cli::try_parse_from(["seriallink", "ports", "--format", "json"])
            .expect("ports args should parse");
        assert!(matches!(cli.command, Command::Ports(_)));
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
    }
}
