//! Joystick jogging against simulated hardware.
//!
//! A fake XInput backend sweeps the left stick in a circle; the bridge
//! forwards it to a drive loop whose device only logs what it is told.
//!
//! ```text
//! cargo run --example joystick_jog [config.toml]
//! RUST_LOG=debug cargo run --example joystick_jog
//! ```

use std::f32::consts::TAU;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use stepper_jog::config::{AxisBinding, JoystickConfig, SystemConfig};
use stepper_jog::gamepad::{
    layout::XINPUT_STATE_SIZE, GamepadAxis, GamepadSource, JoystickBridge, XInputBackend,
    XInputGamepad, STATUS_SUCCESS,
};
use stepper_jog::{AxisDriveLoop, Hertz, StepperDevice, Steps, Volts};

/// Stick moving in a circle with a 2 s period.
struct CircleBackend {
    started: Instant,
    packet: u32,
}

impl XInputBackend for CircleBackend {
    fn get_state(&mut self, _user_index: u32, state: &mut [u8; XINPUT_STATE_SIZE]) -> u32 {
        let phase = self.started.elapsed().as_secs_f32() / 2.0 * TAU;
        let lx = (phase.cos() * 32767.0) as i16;
        let ly = (phase.sin() * 32767.0) as i16;

        self.packet = self.packet.wrapping_add(1);
        *state = [0; XINPUT_STATE_SIZE];
        state[0..4].copy_from_slice(&self.packet.to_le_bytes());
        state[8..10].copy_from_slice(&lx.to_le_bytes());
        state[10..12].copy_from_slice(&ly.to_le_bytes());
        STATUS_SUCCESS
    }

    fn get_capabilities(&mut self, _user_index: u32, _flags: u32) -> u32 {
        STATUS_SUCCESS
    }
}

/// Tracks positions and logs every command.
#[derive(Default)]
struct LoggingDevice {
    positions: Vec<(String, i64)>,
}

impl StepperDevice for LoggingDevice {
    fn set_frequency(&mut self, axis: &str, frequency: Hertz) -> stepper_jog::Result<()> {
        info!(axis, frequency_hz = frequency.value(), "set frequency");
        Ok(())
    }

    fn set_voltage(&mut self, axis: &str, voltage: Volts) -> stepper_jog::Result<()> {
        info!(axis, voltage = voltage.value(), "set voltage");
        Ok(())
    }

    fn move_steps(&mut self, axis: &str, steps: Steps) -> stepper_jog::Result<()> {
        let index = match self.positions.iter().position(|(a, _)| a == axis) {
            Some(index) => index,
            None => {
                self.positions.push((axis.to_owned(), 0));
                self.positions.len() - 1
            }
        };
        let position = &mut self.positions[index].1;
        *position += steps.value();
        info!(axis, steps = steps.value(), position = *position, "move");
        Ok(())
    }

    fn stop_all(&mut self) -> stepper_jog::Result<()> {
        info!("stop all");
        Ok(())
    }
}

fn setup_tracing() {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn default_joystick() -> stepper_jog::Result<JoystickConfig> {
    let mut joystick = JoystickConfig::default();
    let _ = joystick
        .bindings
        .push(AxisBinding::new(GamepadAxis::LeftHorizontal, "x")?);
    let _ = joystick
        .bindings
        .push(AxisBinding::new(GamepadAxis::LeftVertical, "y")?);
    Ok(joystick)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => stepper_jog::load_config(path)?,
        None => SystemConfig::default(),
    };
    let joystick = match config.joystick.clone() {
        Some(joystick) => joystick,
        None => default_joystick()?,
    };

    let drive = AxisDriveLoop::activate(config.drive.clone(), LoggingDevice::default())?;

    let backend = CircleBackend {
        started: Instant::now(),
        packet: 0,
    };
    let mut gamepad = XInputGamepad::new(backend, joystick.joystick_id)?;
    info!(gamepad = %gamepad.name(), connected = gamepad.is_connected(), "gamepad ready");

    let bridge = JoystickBridge::from_config(gamepad, &joystick)
        .spawn(drive.clone(), joystick.poll_frequency)?;

    thread::sleep(Duration::from_secs(3));

    bridge.stop();
    drive.deactivate()?;
    drive.with_device(|device| {
        for (axis, position) in &device.positions {
            info!(axis = axis.as_str(), position, "final position");
        }
    });

    Ok(())
}
