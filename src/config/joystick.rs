//! Joystick bridge configuration from TOML.

use heapless::Vec;
use serde::Deserialize;

use super::axis::{axis_id, AxisId};
use super::units::Hertz;
use crate::error::Result;
use crate::gamepad::GamepadAxis;

/// Maximum number of gamepad-to-axis bindings.
pub const MAX_BINDINGS: usize = 6;

/// Gamepad polling and axis bindings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JoystickConfig {
    /// XInput controller index (0 to 3).
    #[serde(default)]
    pub joystick_id: u8,

    /// How often the gamepad is read.
    #[serde(
        rename = "poll_frequency_hz",
        alias = "poll_frequency",
        default = "default_poll_frequency"
    )]
    pub poll_frequency: Hertz,

    /// Gamepad axis to drive axis mapping.
    #[serde(default)]
    pub bindings: Vec<AxisBinding, MAX_BINDINGS>,
}

fn default_poll_frequency() -> Hertz {
    Hertz(20.0)
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            joystick_id: 0,
            poll_frequency: default_poll_frequency(),
            bindings: Vec::new(),
        }
    }
}

/// Routes one gamepad axis to one drive axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxisBinding {
    /// Gamepad input, e.g. `left_horizontal`.
    pub input: GamepadAxis,

    /// Drive axis name.
    pub axis: AxisId,

    /// Flip the sign of the input.
    #[serde(default)]
    pub invert: bool,
}

impl AxisBinding {
    /// Create a non-inverted binding.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidAxisName` for an axis name longer than 16 chars.
    pub fn new(input: GamepadAxis, axis: &str) -> Result<Self> {
        Ok(Self {
            input,
            axis: axis_id(axis)?,
            invert: false,
        })
    }

    /// Set inversion.
    pub fn inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }
}
