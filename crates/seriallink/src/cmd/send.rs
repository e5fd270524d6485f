use std::io::Read;

use seriallink_comm::Comm;
use seriallink_frame::{Command, Message};
use seriallink_transport::SerialStream;

use crate::cmd::SendArgs;
use crate::config::ConfigFile;
use crate::exit::{comm_error, io_error, transport_error, CliError, CliResult, SUCCESS, TIMEOUT, USAGE};
use crate::output::{print_message, OutputFormat};

pub fn run(args: SendArgs, format: OutputFormat) -> CliResult<i32> {
    // Validate the request before touching any device.
    let command = parse_command(&args.command)?;
    let payload = resolve_payload(&args)?;

    let config = ConfigFile::load(&args.config)?;
    let port = config.resolve_port(args.port.as_deref())?;
    let link_config = config.link_config();

    let stream = SerialStream::open(&port, link_config.baudrate, link_config.timeout)
        .map_err(|err| transport_error("open failed", err))?;
    let mut comm = Comm::new(stream, link_config.clone());

    let msg = Message::new(command, payload).with_id(args.id);
    comm.write_message(&msg)
        .map_err(|err| comm_error("send failed", err))?;

    if args.wait {
        let response = comm
            .read_message(link_config.timeout)
            .map_err(|err| comm_error("receive failed", err))?;
        match response {
            Some(response) => print_message(&response, format),
            None => return Err(CliError::new(TIMEOUT, "no response within timeout")),
        }
    }

    Ok(SUCCESS)
}

/// Accept symbolic (ack/nak/ping/raw), hex (0x..), or decimal commands.
fn parse_command(value: &str) -> CliResult<Command> {
    let name = value.trim().to_ascii_lowercase();
    match name.as_str() {
        "ack" => return Ok(Command::Ack),
        "nak" => return Ok(Command::Nak),
        "ping" => return Ok(Command::Ping),
        "raw" => return Ok(Command::Raw),
        _ => {}
    }

    let parsed = match name.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => name.parse::<u16>(),
    };
    parsed
        .map(Command::from)
        .map_err(|_| CliError::new(USAGE, format!("invalid command: {value} (u16 range)")))
}

fn resolve_payload(args: &SendArgs) -> CliResult<Vec<u8>> {
    if let Some(text) = &args.string {
        return Ok(text.as_bytes().to_vec());
    }
    if let Some(hexstr) = &args.hex {
        let compact: String = hexstr.chars().filter(|c| !c.is_whitespace()).collect();
        return hex::decode(&compact)
            .map_err(|err| CliError::new(USAGE, format!("invalid hex payload: {err}")));
    }
    // Fall back to stdin.
    let mut buf = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buf)
        .map_err(|err| io_error("failed reading stdin", err))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbolic_commands() {
        assert_eq!(parse_command("ack").unwrap(), Command::Ack);
        assert_eq!(parse_command("NAK").unwrap(), Command::Nak);
        assert_eq!(parse_command(" ping ").unwrap(), Command::Ping);
        assert_eq!(parse_command("raw").unwrap(), Command::Raw);
    }

    #[test]
    fn parses_numeric_commands() {
        assert_eq!(parse_command("0x10").unwrap(), Command::Other(0x10));
        assert_eq!(parse_command("0xBEEF").unwrap(), Command::Other(0xBEEF));
        assert_eq!(parse_command("256").unwrap(), Command::Other(256));
        // Reserved numeric values map back to their symbolic variants.
        assert_eq!(parse_command("3").unwrap(), Command::Ping);
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("zzz").is_err());
        assert!(parse_command("0x10000").is_err());
        assert!(parse_command("65536").is_err());
        assert!(parse_command("-1").is_err());
    }

    #[test]
    fn hex_payload_accepts_spacing() {
        let args = SendArgs {
            command: "raw".to_string(),
            config: "config.toml".into(),
            port: None,
            string: None,
            hex: Some("01 02 0a".to_string()),
            id: 0,
            wait: false,
        };
        assert_eq!(resolve_payload(&args).unwrap(), vec![0x01, 0x02, 0x0A]);
    }

    #[test]
    fn hex_payload_rejects_odd_digits() {
        let args = SendArgs {
            command: "raw".to_string(),
            config: "config.toml".into(),
            port: None,
            string: None,
            hex: Some("01020".to_string()),
            id: 0,
            wait: false,
        };
        assert!(resolve_payload(&args).is_err());
    }

    #[test]
    fn string_payload_passes_through() {
        let args = SendArgs {
            command: "raw".to_string(),
            config: "config.toml".into(),
            port: None,
            string: Some("héllo".to_string()),
            hex: None,
            id: 0,
            wait: false,
        };
        assert_eq!(resolve_payload(&args).unwrap(), "héllo".as_bytes());
    }
}
