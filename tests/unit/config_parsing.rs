//! Unit tests for TOML configuration parsing.

use stepper_jog::config::{parse_config, InterfaceKind, SystemConfig};
use stepper_jog::gamepad::GamepadAxis;
use stepper_jog::{Hertz, Volts};

const FULL_CONFIG: &str = r#"
[drive]
ui_frequency_hz = 10.0
hardware_frequency_hz = 1000.0
hardware_voltage = 35.0
axes = ["x", "y", "z"]

[anc300]
interface_type = "ethernet"
host = "192.168.0.20"
port = 7231
password = "secret"

[anc300.axes.x]
id = 1
voltage_range = [0.0, 60.0]
frequency_range = [0.0, 10000.0]
position_range = [0.0, 5.0]
frequency = 20.0
voltage = 30.0

[anc300.axes.y]
id = 2
feedback = true

[anc300.axes.z]
id = 3

[joystick]
joystick_id = 1
poll_frequency_hz = 25.0

[[joystick.bindings]]
input = "left_horizontal"
axis = "x"

[[joystick.bindings]]
input = "left_vertical"
axis = "y"
invert = true

[[joystick.bindings]]
input = "right_vertical"
axis = "z"
"#;

/// Test parsing every section at once.
#[test]
fn test_parse_full_config() {
    let config = parse_config(FULL_CONFIG).expect("Failed to parse TOML");

    assert_eq!(config.drive.hardware_voltage, Volts(35.0));
    assert_eq!(config.drive_axes().collect::<Vec<_>>(), ["x", "y", "z"]);

    let anc300 = config.anc300.as_ref().expect("controller section");
    assert_eq!(anc300.interface_type, InterfaceKind::Ethernet);
    assert_eq!(anc300.host.as_deref(), Some("192.168.0.20"));
    assert_eq!(anc300.port, 7231);
    assert_eq!(anc300.password.as_str(), "secret");
    assert_eq!(anc300.axis_names().count(), 3);

    let y = anc300.axis("y").expect("axis y");
    assert_eq!(y.id, 2);
    assert!(y.feedback);
    // per-axis defaults
    assert_eq!(y.frequency, Hertz(20.0));
    assert_eq!(y.voltage, Volts(30.0));
    assert_eq!(y.voltage_range.max(), 60.0);

    let joystick = config.joystick.as_ref().expect("joystick section");
    assert_eq!(joystick.joystick_id, 1);
    assert_eq!(joystick.poll_frequency, Hertz(25.0));
    assert_eq!(joystick.bindings.len(), 3);
    assert_eq!(joystick.bindings[1].input, GamepadAxis::LeftVertical);
    assert!(joystick.bindings[1].invert);
    assert!(!joystick.bindings[0].invert);
}

/// Test that a disabled middle slot keeps the remaining slot positions.
#[test]
fn test_parse_disabled_slot() {
    let config = parse_config(
        r#"
[drive]
axes = ["", "y"]
"#,
    )
    .unwrap();

    let slots = config.drive.axes.slots();
    assert!(slots[0].is_none());
    assert_eq!(slots[1].as_deref(), Some("y"));
    assert!(slots[2].is_none());
    assert_eq!(config.drive.axes.first(), Some("y"));
}

/// Test parsing directly through serde without validation.
#[test]
fn test_deserialize_without_validation() {
    let toml_str = r#"
[drive]
ui_frequency_hz = -1.0
"#;

    let config: SystemConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert_eq!(config.drive.ui_frequency, Hertz(-1.0));
    assert!(parse_config(toml_str).is_err());
}

/// Test that unknown gamepad inputs are rejected at parse time.
#[test]
fn test_unknown_gamepad_input() {
    let toml_str = r#"
[[joystick.bindings]]
input = "left_wheel"
axis = "x"
"#;

    assert!(toml::from_str::<SystemConfig>(toml_str).is_err());
}

/// Test that axis names longer than 16 characters are rejected.
#[test]
fn test_long_axis_name() {
    let toml_str = r#"
[drive]
axes = ["a_really_long_axis_name"]
"#;

    assert!(parse_config(toml_str).is_err());
}

/// Test loading from a file on disk.
#[test]
fn test_load_config_from_file() {
    let path = std::env::temp_dir().join(format!("stepper-jog-{}.toml", std::process::id()));
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = stepper_jog::load_config(&path);
    std::fs::remove_file(&path).ok();

    assert!(config.is_ok());
}

/// Test that a missing file maps to an I/O configuration error.
#[test]
fn test_load_missing_file() {
    use stepper_jog::error::{ConfigError, Error};

    let result = stepper_jog::load_config("/nonexistent/stepper-jog.toml");
    assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
}
