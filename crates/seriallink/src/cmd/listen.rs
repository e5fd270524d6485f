use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use seriallink_comm::Comm;
use seriallink_transport::SerialStream;

use crate::cmd::ListenArgs;
use crate::config::ConfigFile;
use crate::exit::{comm_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_message, print_raw, OutputFormat};

pub fn run(args: ListenArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ConfigFile::load(&args.config)?;
    let port = config.resolve_port(args.port.as_deref())?;
    let link_config = config.link_config();

    let stream = SerialStream::open(&port, link_config.baudrate, link_config.timeout)
        .map_err(|err| transport_error("open failed", err))?;
    let mut comm = Comm::new(stream, link_config.clone());

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        if args.raw {
            match comm.read(link_config.timeout) {
                Ok(Some(body)) => {
                    print_raw(&body);
                    printed = printed.saturating_add(1);
                }
                Ok(None) => continue,
                Err(err) => return Err(comm_error("receive failed", err)),
            }
        } else {
            match comm.read_message(link_config.timeout) {
                Ok(Some(msg)) => {
                    print_message(&msg, format);
                    printed = printed.saturating_add(1);
                }
                Ok(None) => continue,
                Err(err) => return Err(comm_error("receive failed", err)),
            }
        }

        if let Some(count) = args.count {
            if printed >= count {
                break;
            }
        }
    }

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
