//! Configuration module for stepper-jog.
//!
//! Provides types for loading and validating the drive loop, stepper
//! controller and joystick configuration from TOML files (with `std`
//! feature) or pre-parsed data.

mod anc300;
mod axis;
mod drive;
mod joystick;
mod system;
pub mod units;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use anc300::{Anc300AxisConfig, Anc300Config, InterfaceKind};
pub use axis::{axis_id, AxisId, AxisSlots, MAX_AXES};
pub use drive::LoopConfig;
pub use joystick::{AxisBinding, JoystickConfig, MAX_BINDINGS};
pub use system::SystemConfig;
pub use validation::{validate_config, validate_drive};

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{AnalogCommand, Hertz, Steps, ValueRange, Volts};
