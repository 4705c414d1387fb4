//! # stepper-jog
//!
//! Analog jogging of stepper axes: a joystick (or any other analog source)
//! pushes commands in `[-1.0, 1.0]`, a periodic drive loop turns them into
//! step counts for a stepper controller.
//!
//! ## Features
//!
//! - **Self-rearming drive loop**: single-shot timer re-armed every tick, no
//!   tick backlog behind a slow device
//! - **Per-axis command buffers**: written from any thread, consumed and
//!   reset by the loop
//! - **Devices**: attocube ANC300 over TCP, STEP/DIR drivers on
//!   embedded-hal 1.0 pins
//! - **XInput decoding**: fixed-layout `XINPUT_STATE` parsing and a polling
//!   bridge to the loop
//! - **Configuration-driven**: loop, controller and bindings in one TOML file
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stepper_jog::{device::Anc300, AxisDriveLoop};
//!
//! let config = stepper_jog::load_config("jog.toml")?;
//! let mut anc = Anc300::connect(config.anc300.as_ref().unwrap())?;
//! anc.initialize_axes()?;
//!
//! let drive = AxisDriveLoop::activate(config.drive, anc)?;
//! drive.set_axis_command("x", 0.5); // 50 steps per tick at 1000/10 Hz
//! drive.deactivate()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): TOML loading, threaded drive loop, ANC300 driver,
//!   joystick bridge, `tracing` logs
//! - `defmt`: `defmt::Format` on plain enums for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

pub mod config;
pub mod device;
pub mod drive;
pub mod error;
pub mod gamepad;

pub use config::{validate_config, LoopConfig, SystemConfig};
pub use device::StepperDevice;
pub use drive::{command_to_steps, tick_period_ms};
pub use error::{Error, Result};

#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
#[cfg(feature = "std")]
pub use drive::{AxisDriveLoop, CommandSink, Scheduler, ThreadTimer};

// Unit types
pub use config::units::{AnalogCommand, Hertz, Steps, Volts};
