use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use seriallink_comm::LinkConfig;
use tracing::warn;

use crate::exit::{io_error, CliError, CliResult, USAGE};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// The `config.toml` surface. Every field has a default so a missing file
/// or a sparse one still yields a working configuration; only the port has
/// no sensible default and must come from the file or the `--port` flag.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub serial: SerialSection,
    pub hdlc: HdlcSection,
    pub format: FormatSection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SerialSection {
    pub port: Option<String>,
    pub baudrate: u32,
    /// Read timeout in seconds.
    pub timeout: f64,
}

impl Default for SerialSection {
    fn default() -> Self {
        Self {
            port: None,
            baudrate: 115_200,
            timeout: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HdlcSection {
    pub crc_enabled: bool,
    pub max_payload: usize,
}

impl Default for HdlcSection {
    fn default() -> Self {
        Self {
            crc_enabled: false,
            max_payload: 4096,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FormatSection {
    /// Encoding for string payloads. Only UTF-8 (and its ASCII subset) is
    /// supported; the field exists so configs written for other tools fail
    /// loudly instead of silently mis-encoding.
    pub encoding: String,
}

impl Default for FormatSection {
    fn default() -> Self {
        Self {
            encoding: "utf-8".to_string(),
        }
    }
}

impl ConfigFile {
    /// Load `path`, falling back to defaults (with a warning) when absent.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(io_error(
                    &format!("failed reading {}", path.display()),
                    err,
                ))
            }
        };

        let config: Self = toml::from_str(&text).map_err(|err| {
            CliError::new(
                USAGE,
                format!("failed to parse {}: {err}", path.display()),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if !(1..=65_535).contains(&self.hdlc.max_payload) {
            return Err(CliError::new(
                USAGE,
                "hdlc.max_payload must be in 1..=65535 (fits the u16 length field)",
            ));
        }
        if !self.serial.timeout.is_finite() || self.serial.timeout <= 0.0 {
            return Err(CliError::new(
                USAGE,
                "serial.timeout must be a positive number of seconds",
            ));
        }
        let encoding = self.format.encoding.to_ascii_lowercase();
        if !matches!(encoding.as_str(), "utf-8" | "utf8" | "ascii") {
            return Err(CliError::new(
                USAGE,
                format!("unsupported format.encoding: {}", self.format.encoding),
            ));
        }
        Ok(())
    }

    pub fn link_config(&self) -> LinkConfig {
        LinkConfig {
            baudrate: self.serial.baudrate,
            timeout: Duration::from_secs_f64(self.serial.timeout),
            crc_enabled: self.hdlc.crc_enabled,
            max_payload: self.hdlc.max_payload,
        }
    }

    /// Port resolution order: `--port` flag, then `serial.port` from the file.
    pub fn resolve_port(&self, flag: Option<&str>) -> CliResult<String> {
        flag.map(str::to_string)
            .or_else(|| self.serial.port.clone())
            .ok_or_else(|| {
                CliError::new(
                    USAGE,
                    "no serial port given: pass --port or set serial.port in the config",
                )
            })
    }
}
