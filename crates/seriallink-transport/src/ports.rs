use serialport::SerialPortType;

use crate::error::Result;

/// A detected serial device, flattened for display.
#[derive(Debug, Clone)]
pub struct PortInfo {
    pub name: String,
    pub kind: &'static str,
    pub description: Option<String>,
}

/// Enumerate OS serial devices.
pub fn detected_ports() -> Result<Vec<PortInfo>> {
    let mut ports: Vec<PortInfo> = serialport::available_ports()?
        .into_iter()
        .map(|port| {
            let (kind, description) = match port.port_type {
                SerialPortType::UsbPort(usb) => {
                    let mut parts = Vec::new();
                    if let Some(manufacturer) = usb.manufacturer {
                        parts.push(manufacturer);
                    }
                    if let Some(product) = usb.product {
                        parts.push(product);
                    }
                    parts.push(format!("{:04x}:{:04x}", usb.vid, usb.pid));
                    ("usb", Some(parts.join(" ")))
                }
                SerialPortType::PciPort => ("pci", None),
                SerialPortType::BluetoothPort => ("bluetooth", None),
                SerialPortType::Unknown => ("unknown", None),
            };
            PortInfo {
                name: port.port_name,
                kind,
                description,
            }
        })
        .collect();
    ports.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(ports)
}

/// Enumerate device names ordered by how likely they are to carry a
/// USB-UART peer: platform-typical USB bridges first, everything else after,
/// each group sorted by name.
pub fn candidate_ports() -> Result<Vec<String>> {
    let mut names: Vec<String> = detected_ports()?
        .into_iter()
        .map(|port| port.name)
        .collect();
    names.sort();
    Ok(order_by_likelihood(names))
}

fn order_by_likelihood(all: Vec<String>) -> Vec<String> {
    let (mut likely, rest): (Vec<_>, Vec<_>) =
        all.into_iter().partition(|name| is_likely(name));
    likely.extend(rest);
    likely
}

#[cfg(target_os = "linux")]
fn is_likely(name: &str) -> bool {
    name.contains("ttyUSB") || name.contains("ttyACM")
}

#[cfg(target_os = "macos")]
fn is_likely(name: &str) -> bool {
    name.contains("cu.usbserial") || name.contains("cu.usbmodem")
}

#[cfg(windows)]
fn is_likely(name: &str) -> bool {
    name.starts_with("COM")
}

#[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
fn is_likely(_name: &str) -> bool {
    true
}
