//! Drive loop configuration from TOML.

use serde::Deserialize;

use super::axis::AxisSlots;
use super::units::{Hertz, Volts};

/// Analog drive loop configuration.
///
/// Field names follow the `*_hz` convention; the short names
/// (`ui_frequency`, `hardware_frequency`, `axis`) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoopConfig {
    /// Rate at which pending analog commands are sampled.
    #[serde(
        rename = "ui_frequency_hz",
        alias = "ui_frequency",
        default = "default_ui_frequency"
    )]
    pub ui_frequency: Hertz,

    /// Device step clock used to turn a command into a step count.
    #[serde(
        rename = "hardware_frequency_hz",
        alias = "hardware_frequency",
        default = "default_hardware_frequency"
    )]
    pub hardware_frequency: Hertz,

    /// Drive voltage applied to every axis at activation.
    #[serde(default = "default_hardware_voltage")]
    pub hardware_voltage: Volts,

    /// Driven axes, in slot order.
    #[serde(default, alias = "axis")]
    pub axes: AxisSlots,
}

fn default_ui_frequency() -> Hertz {
    Hertz(10.0)
}

fn default_hardware_frequency() -> Hertz {
    Hertz(1000.0)
}

fn default_hardware_voltage() -> Volts {
    Volts(40.0)
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            ui_frequency: default_ui_frequency(),
            hardware_frequency: default_hardware_frequency(),
            hardware_voltage: default_hardware_voltage(),
            axes: AxisSlots::default(),
        }
    }
}

impl LoopConfig {
    /// Replace the axis slots.
    pub fn with_axes(mut self, axes: AxisSlots) -> Self {
        self.axes = axes;
        self
    }
}
