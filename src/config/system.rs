//! System configuration - root configuration structure.

use serde::Deserialize;

use super::anc300::Anc300Config;
use super::drive::LoopConfig;
use super::joystick::JoystickConfig;

/// Root configuration structure from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemConfig {
    /// Analog drive loop.
    #[serde(default)]
    pub drive: LoopConfig,

    /// ANC300 stepper controller, if one is used.
    #[serde(default)]
    pub anc300: Option<Anc300Config>,

    /// Gamepad bridge, if one is used.
    #[serde(default)]
    pub joystick: Option<JoystickConfig>,
}

impl SystemConfig {
    /// Names of the driven axes, in slot order.
    pub fn drive_axes(&self) -> impl Iterator<Item = &str> {
        self.drive.axes.active().map(|(_, name)| name)
    }
}
