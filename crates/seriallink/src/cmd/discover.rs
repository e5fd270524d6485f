use seriallink_comm::{discover, CommError};
use seriallink_transport::{candidate_ports, SerialStream};
use tracing::info;

use crate::cmd::DiscoverArgs;
use crate::config::ConfigFile;
use crate::exit::{comm_error, transport_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::OutputFormat;

pub fn run(args: DiscoverArgs, format: OutputFormat) -> CliResult<i32> {
    let config = ConfigFile::load(&args.config)?;
    let link_config = config.link_config();

    let candidates =
        candidate_ports().map_err(|err| transport_error("port enumeration failed", err))?;
    info!(count = candidates.len(), "probing candidate ports");

    let found = discover(&candidates, SerialStream::open, &link_config);
    match found {
        Ok(Some(port)) => {
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "port": port }));
                }
                _ => println!("{port}"),
            }
            Ok(SUCCESS)
        }
        Ok(None) => Err(CliError::new(FAILURE, "no responding serial port found")),
        Err(CommError::NoCandidates) => {
            Err(CliError::new(FAILURE, "no serial ports detected"))
        }
        Err(err) => Err(comm_error("discovery failed", err)),
    }
}
