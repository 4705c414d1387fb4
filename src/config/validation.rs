//! Configuration validation.

use crate::error::{bounded, ConfigError, Error, Result};
use crate::gamepad::MAX_CONTROLLER_ID;

use super::anc300::{Anc300AxisConfig, Anc300Config, InterfaceKind};
use super::axis::MAX_AXES;
use super::drive::LoopConfig;
use super::joystick::JoystickConfig;
use super::SystemConfig;

/// Validate a system configuration.
///
/// Checks:
/// - Drive frequencies are positive, voltage is finite, axes are unique
/// - ANC300 axes have ordered ranges, in-range defaults and unique ids
/// - Every driven axis exists on the ANC300 when one is configured
/// - Joystick bindings target driven axes
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    validate_drive(&config.drive)?;

    if let Some(ref anc300) = config.anc300 {
        validate_anc300(anc300)?;
        for (_, axis) in config.drive.axes.active() {
            if anc300.axis(axis).is_none() {
                return Err(Error::Config(ConfigError::UnknownStepperAxis(bounded(axis))));
            }
        }
    }

    if let Some(ref joystick) = config.joystick {
        validate_joystick(joystick, &config.drive)?;
    }

    Ok(())
}

/// Validate the drive loop section on its own.
pub fn validate_drive(config: &LoopConfig) -> Result<()> {
    // Both rates must be strictly positive
    if !config.ui_frequency.is_positive() {
        return Err(Error::Config(ConfigError::InvalidUiFrequency(
            config.ui_frequency.0,
        )));
    }

    if !config.hardware_frequency.is_positive() {
        return Err(Error::Config(ConfigError::InvalidHardwareFrequency(
            config.hardware_frequency.0,
        )));
    }

    if !config.hardware_voltage.0.is_finite() {
        return Err(Error::Config(ConfigError::InvalidVoltage(
            config.hardware_voltage.0,
        )));
    }

    // Axis names must be unique and usable as protocol tokens
    let mut seen: heapless::Vec<&str, MAX_AXES> = heapless::Vec::new();
    for (_, axis) in config.axes.active() {
        check_axis_name(axis)?;
        if seen.contains(&axis) {
            return Err(Error::Config(ConfigError::DuplicateAxis(bounded(axis))));
        }
        let _ = seen.push(axis);
    }

    Ok(())
}

fn validate_anc300(config: &Anc300Config) -> Result<()> {
    match config.interface_type {
        InterfaceKind::Ethernet => {
            if config.host.as_ref().map_or(true, |h| h.is_empty()) {
                return Err(Error::Config(ConfigError::MissingHost));
            }
        }
        InterfaceKind::Usb => {
            return Err(Error::Config(ConfigError::UnsupportedInterface(bounded(
                config.interface_type.as_str(),
            ))));
        }
    }

    let mut ids: heapless::Vec<u8, 8> = heapless::Vec::new();
    for (name, axis) in config.axes.iter() {
        check_axis_name(name.as_str())?;
        validate_anc300_axis(name.as_str(), axis)?;
        if ids.contains(&axis.id) {
            return Err(Error::Config(ConfigError::DuplicateAxisId(axis.id)));
        }
        let _ = ids.push(axis.id);
    }

    Ok(())
}

fn validate_anc300_axis(name: &str, axis: &Anc300AxisConfig) -> Result<()> {
    for range in [axis.voltage_range, axis.frequency_range, axis.position_range] {
        if !range.is_valid() {
            return Err(Error::Config(ConfigError::InvalidRange {
                min: range.min(),
                max: range.max(),
            }));
        }
    }

    if !axis.voltage_range.contains(axis.voltage.0) {
        return Err(Error::Config(ConfigError::DefaultOutOfRange {
            axis: bounded(name),
            value: axis.voltage.0,
        }));
    }

    if !axis.frequency_range.contains(axis.frequency.0) {
        return Err(Error::Config(ConfigError::DefaultOutOfRange {
            axis: bounded(name),
            value: axis.frequency.0,
        }));
    }

    Ok(())
}

fn validate_joystick(config: &JoystickConfig, drive: &LoopConfig) -> Result<()> {
    if config.joystick_id > MAX_CONTROLLER_ID {
        return Err(Error::Config(ConfigError::InvalidJoystickId(
            config.joystick_id,
        )));
    }

    if !config.poll_frequency.is_positive() {
        return Err(Error::Config(ConfigError::InvalidPollFrequency(
            config.poll_frequency.0,
        )));
    }

    for binding in config.bindings.iter() {
        if !drive.axes.contains(binding.axis.as_str()) {
            return Err(Error::Config(ConfigError::UnknownDriveAxis(
                binding.axis.clone(),
            )));
        }
    }

    Ok(())
}

fn check_axis_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(Error::Config(ConfigError::InvalidAxisName(bounded(name))));
    }
    Ok(())
}
