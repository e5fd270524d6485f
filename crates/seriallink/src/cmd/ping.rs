use std::time::Instant;

use seriallink_comm::Comm;
use seriallink_frame::{Command, Message};
use seriallink_transport::SerialStream;
use tracing::debug;

use crate::cmd::PingArgs;
use crate::config::ConfigFile;
use crate::exit::{comm_error, transport_error, CliError, CliResult, SUCCESS, TIMEOUT};
use crate::output::OutputFormat;

pub fn run(args: PingArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ConfigFile::load(&args.config)?;
    let port = config.resolve_port(args.port.as_deref())?;
    let link_config = config.link_config();

    let stream = SerialStream::open(&port, link_config.baudrate, link_config.timeout)
        .map_err(|err| transport_error("open failed", err))?;
    let mut comm = Comm::new(stream, link_config.clone());

    // A fresh id per invocation so a stale echo cannot satisfy this ping.
    let id = uuid::Uuid::new_v4().as_bytes()[0];
    let started = Instant::now();
    comm.write_message(&Message::ping().with_id(id))
        .map_err(|err| comm_error("ping send failed", err))?;

    let deadline = started + link_config.timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        let response = comm
            .read_message(remaining)
            .map_err(|err| comm_error("ping receive failed", err))?;
        match response {
            Some(msg) if msg.command == Command::Ping && msg.id == id => {
                let rtt = started.elapsed();
                report(&port, id, rtt.as_secs_f64() * 1000.0, format);
                return Ok(SUCCESS);
            }
            Some(msg) => {
                debug!(command = %msg.command, id = msg.id, "ignoring unrelated message");
            }
            None => break,
        }
    }

    Err(CliError::new(
        TIMEOUT,
        format!("no ping response from {port}"),
    ))
}

fn report(port: &str, id: u8, rtt_ms: f64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "port": port, "id": id, "rtt_ms": rtt_ms })
            );
        }
        _ => {
            println!("reply from {port}: id={id} time={rtt_ms:.1} ms");
        }
    }
}
