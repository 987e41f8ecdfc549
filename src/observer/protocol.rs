//! usb2snes request/reply shapes and the device seam the observer talks through.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Memory space every request targets.
pub const SPACE: &str = "SNES";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Request {
    pub opcode: &'static str,
    pub space: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<String>,
}

impl Request {
    pub fn device_list() -> Self {
        Self {
            opcode: "DeviceList",
            space: SPACE,
            operands: Vec::new(),
        }
    }

    pub fn attach(device: &str) -> Self {
        Self {
            opcode: "Attach",
            space: SPACE,
            operands: vec![device.to_string()],
        }
    }

    /// Read `size` bytes at `address`; both are sent as hex strings.
    pub fn get_address(address: &str, size: usize) -> Self {
        Self {
            opcode: "GetAddress",
            space: SPACE,
            operands: vec![address.to_string(), format!("{size:X}")],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reply {
    #[serde(default)]
    pub results: Vec<String>,
}

/// An open session with a device-control server.
pub trait DeviceLink {
    fn device_list(&mut self) -> Result<Vec<String>>;
    fn attach(&mut self, device: &str) -> Result<()>;
    fn read_memory(&mut self, address: &str, size: usize) -> Result<Vec<u8>>;
}

/// Opens new device links.
pub trait Connector {
    type Link: DeviceLink;

    fn connect(&self) -> Result<Self::Link>;
}
