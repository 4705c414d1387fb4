//! Unit tests for configuration validation.

use stepper_jog::config::{
    validate_config, validate_drive, Anc300AxisConfig, Anc300Config, AxisBinding, AxisSlots,
    InterfaceKind, JoystickConfig, LoopConfig, SystemConfig, ValueRange,
};
use stepper_jog::error::{ConfigError, Error};
use stepper_jog::gamepad::GamepadAxis;
use stepper_jog::{Hertz, Volts};

fn controller() -> Anc300Config {
    Anc300Config::ethernet("192.168.0.20")
        .with_axis("x", Anc300AxisConfig::new(1))
        .with_axis("y", Anc300AxisConfig::new(2))
}

fn system() -> SystemConfig {
    SystemConfig {
        anc300: Some(controller()),
        ..SystemConfig::default()
    }
}

fn config_error(config: &SystemConfig) -> ConfigError {
    match validate_config(config) {
        Err(Error::Config(e)) => e,
        other => panic!("expected config error, got {:?}", other),
    }
}

/// Test that the defaults validate.
#[test]
fn test_defaults_are_valid() {
    assert!(validate_config(&SystemConfig::default()).is_ok());
    assert!(validate_config(&system()).is_ok());
}

/// Test frequency and voltage checks.
#[test]
fn test_drive_rates() {
    let bad_hardware = LoopConfig {
        hardware_frequency: Hertz(0.0),
        ..LoopConfig::default()
    };
    assert!(matches!(
        validate_drive(&bad_hardware),
        Err(Error::Config(ConfigError::InvalidHardwareFrequency(_)))
    ));

    let nan_ui = LoopConfig {
        ui_frequency: Hertz(f32::NAN),
        ..LoopConfig::default()
    };
    assert!(matches!(
        validate_drive(&nan_ui),
        Err(Error::Config(ConfigError::InvalidUiFrequency(_)))
    ));

    let bad_voltage = LoopConfig {
        hardware_voltage: Volts(f32::INFINITY),
        ..LoopConfig::default()
    };
    assert!(matches!(
        validate_drive(&bad_voltage),
        Err(Error::Config(ConfigError::InvalidVoltage(_)))
    ));
}

/// Test that axis names may not contain whitespace.
#[test]
fn test_axis_name_whitespace() {
    let axes = AxisSlots::from_names([Some("x axis"), None, None]).unwrap();
    let config = LoopConfig::default().with_axes(axes);
    assert!(matches!(
        validate_drive(&config),
        Err(Error::Config(ConfigError::InvalidAxisName(_)))
    ));
}

/// Test controller connection checks.
#[test]
fn test_controller_interface() {
    let mut config = system();
    config.anc300.as_mut().unwrap().host = None;
    assert_eq!(config_error(&config), ConfigError::MissingHost);

    let mut config = system();
    config.anc300.as_mut().unwrap().interface_type = InterfaceKind::Usb;
    assert!(matches!(
        config_error(&config),
        ConfigError::UnsupportedInterface(name) if name.as_str() == "usb"
    ));
}

/// Test controller axis checks.
#[test]
fn test_controller_axes() {
    let mut config = system();
    config.anc300 = Some(
        Anc300Config::ethernet("10.0.0.1")
            .with_axis("x", Anc300AxisConfig::new(1))
            .with_axis("y", Anc300AxisConfig::new(1)),
    );
    assert_eq!(config_error(&config), ConfigError::DuplicateAxisId(1));

    let mut axis = Anc300AxisConfig::new(1);
    axis.position_range = ValueRange(5.0, 0.0);
    config.anc300 = Some(
        Anc300Config::ethernet("10.0.0.1")
            .with_axis("x", axis)
            .with_axis("y", Anc300AxisConfig::new(2)),
    );
    assert!(matches!(
        config_error(&config),
        ConfigError::InvalidRange { min, max } if min == 5.0 && max == 0.0
    ));

    let anc300 = Anc300Config::ethernet("10.0.0.1").with_axis("x", Anc300AxisConfig::new(1));
    config.anc300 = Some(anc300);
    assert!(matches!(
        config_error(&config),
        ConfigError::UnknownStepperAxis(name) if name.as_str() == "y"
    ));
}

/// Test joystick section checks.
#[test]
fn test_joystick() {
    let mut joystick = JoystickConfig::default();
    let binding = AxisBinding::new(GamepadAxis::LeftHorizontal, "x").unwrap();
    joystick.bindings.push(binding).unwrap();

    let mut config = SystemConfig {
        joystick: Some(joystick.clone()),
        ..SystemConfig::default()
    };
    assert!(validate_config(&config).is_ok());

    config.joystick = Some(JoystickConfig {
        joystick_id: 4,
        ..joystick.clone()
    });
    assert_eq!(config_error(&config), ConfigError::InvalidJoystickId(4));

    config.joystick = Some(JoystickConfig {
        poll_frequency: Hertz(0.0),
        ..joystick.clone()
    });
    assert!(matches!(config_error(&config), ConfigError::InvalidPollFrequency(_)));

    let binding = AxisBinding::new(GamepadAxis::RightTrigger, "z").unwrap();
    joystick.bindings.push(binding).unwrap();
    config.joystick = Some(joystick);
    assert!(matches!(
        config_error(&config),
        ConfigError::UnknownDriveAxis(name) if name.as_str() == "z"
    ));
}
