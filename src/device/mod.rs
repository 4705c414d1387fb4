//! Stepper devices driven by the analog loop.
//!
//! A [`StepperDevice`] accepts per-axis frequency, voltage and step commands.
//! Two implementations ship with the crate:
//!
//! - [`PulseStepper`]: STEP/DIR drivers on embedded-hal 1.0 pins
//! - [`Anc300`] (std): attocube ANC300 piezo controller over its ASCII protocol

#[cfg(feature = "std")]
mod anc300;
mod pulse;

#[cfg(feature = "std")]
pub use anc300::Anc300;
pub use pulse::{Direction, PulseStepper};

use crate::config::units::{Hertz, Steps, Volts};
use crate::error::Result;

/// Multi-axis stepper controller.
///
/// Axes are addressed by name. Implementations decide whether a command for
/// an unknown axis is an error (usually [`DeviceError::UnknownAxis`]).
///
/// [`DeviceError::UnknownAxis`]: crate::error::DeviceError::UnknownAxis
pub trait StepperDevice {
    /// Set the step clock of an axis.
    fn set_frequency(&mut self, axis: &str, frequency: Hertz) -> Result<()>;

    /// Set the drive voltage of an axis.
    fn set_voltage(&mut self, axis: &str, voltage: Volts) -> Result<()>;

    /// Issue a signed number of steps on an axis.
    fn move_steps(&mut self, axis: &str, steps: Steps) -> Result<()>;

    /// Stop every axis.
    fn stop_all(&mut self) -> Result<()>;
}

impl<D: StepperDevice + ?Sized> StepperDevice for &mut D {
    fn set_frequency(&mut self, axis: &str, frequency: Hertz) -> Result<()> {
        (**self).set_frequency(axis, frequency)
    }

    fn set_voltage(&mut self, axis: &str, voltage: Volts) -> Result<()> {
        (**self).set_voltage(axis, voltage)
    }

    fn move_steps(&mut self, axis: &str, steps: Steps) -> Result<()> {
        (**self).move_steps(axis, steps)
    }

    fn stop_all(&mut self) -> Result<()> {
        (**self).stop_all()
    }
}

#[cfg(feature = "std")]
impl<D: StepperDevice + ?Sized> StepperDevice for Box<D> {
    fn set_frequency(&mut self, axis: &str, frequency: Hertz) -> Result<()> {
        (**self).set_frequency(axis, frequency)
    }

    fn set_voltage(&mut self, axis: &str, voltage: Volts) -> Result<()> {
        (**self).set_voltage(axis, voltage)
    }

    fn move_steps(&mut self, axis: &str, steps: Steps) -> Result<()> {
        (**self).move_steps(axis, steps)
    }

    fn stop_all(&mut self) -> Result<()> {
        (**self).stop_all()
    }
}

/// `DelayNs` backed by `std::thread::sleep`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct StdDelay;

#[cfg(feature = "std")]
impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
