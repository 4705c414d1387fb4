//! ANC300 piezo stepper controller configuration from TOML.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use super::axis::AxisId;
use super::units::{Hertz, ValueRange, Volts};

/// How the controller is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum InterfaceKind {
    /// Telnet-style TCP session.
    #[default]
    Ethernet,
    /// USB virtual serial port (recognised, not supported).
    Usb,
}

impl InterfaceKind {
    /// Name as written in the configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            InterfaceKind::Ethernet => "ethernet",
            InterfaceKind::Usb => "usb",
        }
    }
}

/// Controller connection and per-axis setup.
#[derive(Debug, Clone, Deserialize)]
pub struct Anc300Config {
    /// Connection type.
    #[serde(default, alias = "interface")]
    pub interface_type: InterfaceKind,

    /// Host name or IP (ethernet only).
    #[serde(default)]
    pub host: Option<String<64>>,

    /// TCP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Authorization code.
    #[serde(default = "default_password")]
    pub password: String<32>,

    /// Named axes.
    #[serde(default)]
    pub axes: FnvIndexMap<AxisId, Anc300AxisConfig, 8>,
}

fn default_port() -> u16 {
    7230
}

fn default_password() -> String<32> {
    String::try_from("123456").unwrap_or_default()
}

impl Anc300Config {
    /// Ethernet configuration with default port and password.
    pub fn ethernet(host: &str) -> Self {
        Self {
            interface_type: InterfaceKind::Ethernet,
            host: String::try_from(host).ok(),
            port: default_port(),
            password: default_password(),
            axes: FnvIndexMap::new(),
        }
    }

    /// Add an axis; ignored when the name is too long or the map is full.
    pub fn with_axis(mut self, name: &str, axis: Anc300AxisConfig) -> Self {
        if let Ok(key) = AxisId::try_from(name) {
            let _ = self.axes.insert(key, axis);
        }
        self
    }

    /// Get an axis configuration by name.
    pub fn axis(&self, name: &str) -> Option<&Anc300AxisConfig> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all axis names.
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(|s| s.as_str())
    }
}

/// One controller channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Anc300AxisConfig {
    /// Controller channel number.
    pub id: u8,

    /// Allowed drive voltage.
    #[serde(default = "default_voltage_range")]
    pub voltage_range: ValueRange,

    /// Allowed step frequency.
    #[serde(default = "default_frequency_range")]
    pub frequency_range: ValueRange,

    /// Travel range (informational).
    #[serde(default = "default_position_range")]
    pub position_range: ValueRange,

    /// Closed-loop position feedback available.
    #[serde(default)]
    pub feedback: bool,

    /// Step frequency applied at initialization.
    #[serde(default = "default_frequency")]
    pub frequency: Hertz,

    /// Drive voltage applied at initialization.
    #[serde(default = "default_voltage")]
    pub voltage: Volts,
}

fn default_voltage_range() -> ValueRange {
    ValueRange(0.0, 60.0)
}

fn default_frequency_range() -> ValueRange {
    ValueRange(0.0, 10000.0)
}

fn default_position_range() -> ValueRange {
    ValueRange(0.0, 5.0)
}

fn default_frequency() -> Hertz {
    Hertz(20.0)
}

fn default_voltage() -> Volts {
    Volts(30.0)
}

impl Anc300AxisConfig {
    /// Channel with default ranges and setpoints.
    pub fn new(id: u8) -> Self {
        Self {
            id,
            voltage_range: default_voltage_range(),
            frequency_range: default_frequency_range(),
            position_range: default_position_range(),
            feedback: false,
            frequency: default_frequency(),
            voltage: default_voltage(),
        }
    }
}
