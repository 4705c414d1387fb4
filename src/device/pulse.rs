//! STEP/DIR pulse stepper device.
//!
//! Generic over embedded-hal 1.0 pin and delay types.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use heapless::Vec;

use crate::config::units::{Hertz, Steps, Volts};
use crate::config::{AxisId, MAX_AXES};
use crate::error::{bounded, DeviceError, Error, Result};

use super::StepperDevice;

/// STEP pulse width in microseconds.
const PULSE_WIDTH_US: u32 = 2;

/// Step clock used until `set_frequency` is called.
const DEFAULT_FREQUENCY: Hertz = Hertz(1000.0);

/// Direction of motor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Positive step count.
    Up,
    /// Negative step count.
    Down,
}

impl Direction {
    /// Get direction from signed step count.
    #[inline]
    pub fn from_steps(steps: i64) -> Self {
        if steps >= 0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// One STEP/DIR output pair.
struct PulseChannel<STEP, DIR> {
    axis: AxisId,
    step_pin: STEP,
    dir_pin: DIR,
    invert_direction: bool,
    /// Cached to avoid unnecessary pin writes.
    current_direction: Option<Direction>,
    frequency: Hertz,
    voltage: Volts,
    position: Steps,
}

impl<STEP: OutputPin, DIR: OutputPin> PulseChannel<STEP, DIR> {
    fn set_direction(&mut self, direction: Direction) -> Result<()> {
        if self.current_direction == Some(direction) {
            return Ok(());
        }

        let pin_high = match direction {
            Direction::Up => !self.invert_direction,
            Direction::Down => self.invert_direction,
        };

        if pin_high {
            self.dir_pin.set_high().map_err(|_| DeviceError::PinError)?;
        } else {
            self.dir_pin.set_low().map_err(|_| DeviceError::PinError)?;
        }

        self.current_direction = Some(direction);
        Ok(())
    }
}

/// STEP/DIR stepper driver for up to three axes sharing one delay provider.
///
/// Moves run to completion inside `move_steps`; the step spacing is the
/// period of the axis frequency. Drive voltage is recorded but has no
/// effect, STEP/DIR drivers set their current in hardware.
///
/// # Example
///
/// ```rust,ignore
/// let mut device = PulseStepper::new(delay);
/// device.add_axis("x", step_x, dir_x, false)?;
/// device.move_steps("x", Steps(50))?;
/// ```
pub struct PulseStepper<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    channels: Vec<PulseChannel<STEP, DIR>, MAX_AXES>,
    delay: DELAY,
}

impl<STEP, DIR, DELAY> PulseStepper<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    /// Create a device with no axes.
    pub fn new(delay: DELAY) -> Self {
        Self {
            channels: Vec::new(),
            delay,
        }
    }

    /// Attach a STEP/DIR pin pair to an axis name.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::AxisCapacityExceeded` when three axes are
    /// already attached or the name is too long.
    pub fn add_axis(
        &mut self,
        axis: &str,
        step_pin: STEP,
        dir_pin: DIR,
        invert_direction: bool,
    ) -> Result<()> {
        let axis = AxisId::try_from(axis).map_err(|_| DeviceError::AxisCapacityExceeded)?;
        self.channels
            .push(PulseChannel {
                axis,
                step_pin,
                dir_pin,
                invert_direction,
                current_direction: None,
                frequency: DEFAULT_FREQUENCY,
                voltage: Volts::default(),
                position: Steps::ZERO,
            })
            .map_err(|_| Error::Device(DeviceError::AxisCapacityExceeded))
    }

    /// Absolute position of an axis in steps.
    pub fn position(&self, axis: &str) -> Option<Steps> {
        self.channels
            .iter()
            .find(|c| c.axis.as_str() == axis)
            .map(|c| c.position)
    }

    /// Current step clock of an axis.
    pub fn frequency(&self, axis: &str) -> Option<Hertz> {
        self.channels
            .iter()
            .find(|c| c.axis.as_str() == axis)
            .map(|c| c.frequency)
    }

    /// Last voltage set on an axis.
    pub fn voltage(&self, axis: &str) -> Option<Volts> {
        self.channels
            .iter()
            .find(|c| c.axis.as_str() == axis)
            .map(|c| c.voltage)
    }

    /// Set current position as the origin.
    pub fn set_origin(&mut self, axis: &str) -> Result<()> {
        self.channel_mut(axis)?.position = Steps::ZERO;
        Ok(())
    }

    /// Release the pins and delay provider.
    pub fn release(self) -> (Vec<(STEP, DIR), MAX_AXES>, DELAY) {
        let mut pins = Vec::new();
        for channel in self.channels {
            let _ = pins.push((channel.step_pin, channel.dir_pin));
        }
        (pins, self.delay)
    }

    fn channel_mut(&mut self, axis: &str) -> Result<&mut PulseChannel<STEP, DIR>> {
        self.channels
            .iter_mut()
            .find(|c| c.axis.as_str() == axis)
            .ok_or_else(|| Error::Device(DeviceError::UnknownAxis(bounded(axis))))
    }
}

impl<STEP, DIR, DELAY> StepperDevice for PulseStepper<STEP, DIR, DELAY>
where
    STEP: OutputPin,
    DIR: OutputPin,
    DELAY: DelayNs,
{
    fn set_frequency(&mut self, axis: &str, frequency: Hertz) -> Result<()> {
        if !frequency.is_positive() {
            return Err(Error::Device(DeviceError::OutOfRange {
                value: frequency.0,
                min: 0.0,
                max: f32::MAX,
            }));
        }
        self.channel_mut(axis)?.frequency = frequency;
        Ok(())
    }

    fn set_voltage(&mut self, axis: &str, voltage: Volts) -> Result<()> {
        self.channel_mut(axis)?.voltage = voltage;
        Ok(())
    }

    fn move_steps(&mut self, axis: &str, steps: Steps) -> Result<()> {
        let Self { channels, delay } = self;
        let channel = channels
            .iter_mut()
            .find(|c| c.axis.as_str() == axis)
            .ok_or_else(|| Error::Device(DeviceError::UnknownAxis(bounded(axis))))?;

        if steps.is_zero() {
            return Ok(());
        }

        let direction = Direction::from_steps(steps.0);
        channel.set_direction(direction)?;

        let interval_ns = channel.frequency.period_ns();
        let total = steps.abs();
        for n in 0..total {
            // Generate step pulse
            channel.step_pin.set_high().map_err(|_| DeviceError::PinError)?;
            delay.delay_us(PULSE_WIDTH_US);
            channel.step_pin.set_low().map_err(|_| DeviceError::PinError)?;

            channel.position = channel.position + Steps(direction.sign());

            if n + 1 < total {
                // Delay until next step (subtract pulse width)
                let delay_ns = interval_ns.saturating_sub(PULSE_WIDTH_US * 1000);
                if delay_ns > 0 {
                    delay.delay_ns(delay_ns);
                }
            }
        }

        Ok(())
    }

    fn stop_all(&mut self) -> Result<()> {
        // Moves complete synchronously, nothing is left running.
        Ok(())
    }
}
