//! Periodic analog drive loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use tracing::{debug, error, info, warn};

use super::commands::PendingCommands;
use super::conversion::{command_to_steps, tick_period_ms};
use super::melody;
use super::scheduler::{Scheduler, ThreadTimer};
use crate::config::units::AnalogCommand;
use crate::config::{validate_drive, LoopConfig};
use crate::device::{StdDelay, StepperDevice};
use crate::error::{bounded, CommandError, Error, Result};

/// Receiver of per-axis analog commands.
///
/// Implemented by [`AxisDriveLoop`]; input sources such as the joystick
/// bridge push through it.
pub trait CommandSink: Send + Sync {
    /// Buffer `value` for `axis`. Invalid commands are logged and dropped.
    fn set_axis_command(&self, axis: &str, value: f32);
}

impl<T: CommandSink + ?Sized> CommandSink for Arc<T> {
    fn set_axis_command(&self, axis: &str, value: f32) {
        (**self).set_axis_command(axis, value)
    }
}

impl<T: CommandSink + ?Sized> CommandSink for &T {
    fn set_axis_command(&self, axis: &str, value: f32) {
        (**self).set_axis_command(axis, value)
    }
}

/// Turns buffered analog commands into step commands at the UI rate.
///
/// Every tick re-arms a single-shot timer before dispatching, then for each
/// driven axis consumes the pending command and sends
/// `trunc(hardware_frequency / ui_frequency * command)` steps. Zero-step
/// results are not sent.
///
/// # Example
///
/// ```rust,ignore
/// let drive = AxisDriveLoop::activate(config.drive, anc300)?;
/// drive.set_axis_command("x", 0.5);   // 50 steps on the next tick
/// drive.deactivate()?;
/// ```
pub struct AxisDriveLoop<D, S> {
    config: LoopConfig,
    period: Duration,
    commands: PendingCommands,
    device: Mutex<D>,
    enabled: AtomicBool,
    scheduler: S,
}

impl<D, S> AxisDriveLoop<D, S>
where
    D: StepperDevice,
    S: Scheduler,
{
    /// Create a stopped loop. `scheduler` must call [`tick`](Self::tick)
    /// when it fires.
    ///
    /// # Errors
    ///
    /// The configuration errors of [`validate_drive`]: non-positive or
    /// non-finite rates, a non-finite voltage, bad or duplicate axis names.
    pub fn new(config: LoopConfig, device: D, scheduler: S) -> Result<Self> {
        validate_drive(&config)?;
        let period = Duration::from_millis(tick_period_ms(config.ui_frequency));
        Ok(Self {
            config,
            period,
            commands: PendingCommands::new(),
            device: Mutex::new(device),
            enabled: AtomicBool::new(false),
            scheduler,
        })
    }

    /// Configure frequency then voltage on every driven axis.
    ///
    /// # Errors
    ///
    /// Every axis is attempted; the first device error is returned.
    pub fn setup_axes(&self) -> Result<()> {
        let mut device = self.device();
        let mut first_error = None;

        for (_, axis) in self.config.axes.active() {
            let results = [
                device.set_frequency(axis, self.config.hardware_frequency),
                device.set_voltage(axis, self.config.hardware_voltage),
            ];
            for result in results {
                if let Err(e) = result {
                    warn!(axis, error = %e, "axis setup failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        info!(
            frequency_hz = self.config.hardware_frequency.0,
            voltage = self.config.hardware_voltage.0,
            axes = self.config.axes.active_count(),
            "axes configured"
        );
        first_error.map_or(Ok(()), Err)
    }

    /// Enable the loop and arm the first tick.
    pub fn start(&self) {
        self.enabled.store(true, Ordering::Release);
        self.scheduler.arm(self.period);
        info!(period_ms = self.period.as_millis() as u64, "drive loop started");
    }

    /// Cancel the pending tick, disable the loop and stop every axis.
    ///
    /// A no-op when the loop is not running. A tick already executing
    /// finishes; later ticks do nothing.
    pub fn stop(&self) -> Result<()> {
        if !self.enabled.swap(false, Ordering::AcqRel) {
            return Ok(());
        }
        self.scheduler.cancel();
        info!("drive loop stopped");
        self.device().stop_all()
    }

    /// Whether ticks are live.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Buffer an analog command for `axis`, replacing the previous one.
    ///
    /// # Errors
    ///
    /// `CommandError::OutOfRange` outside `[-1.0, 1.0]`,
    /// `CommandError::UnknownAxis` for an axis the loop does not drive. The
    /// pending command is unchanged on error.
    pub fn try_set_axis_command(&self, axis: &str, value: f32) -> Result<()> {
        let command = AnalogCommand::new(value)?;
        let slot = self
            .config
            .axes
            .index_of(axis)
            .ok_or_else(|| Error::Command(CommandError::UnknownAxis(bounded(axis))))?;
        self.commands.store(slot, command);
        Ok(())
    }

    /// Buffer an analog command for `axis`. Invalid commands are logged.
    pub fn set_axis_command(&self, axis: &str, value: f32) {
        if let Err(e) = self.try_set_axis_command(axis, value) {
            error!(axis, value, "{}", e);
        }
    }

    /// Command waiting for the next tick, `None` for an undriven axis.
    pub fn pending_command(&self, axis: &str) -> Option<f32> {
        self.config
            .axes
            .index_of(axis)
            .map(|slot| self.commands.peek(slot).value())
    }

    /// Sample and dispatch pending commands once.
    ///
    /// Does nothing, and does not re-arm, while the loop is stopped. Device
    /// errors are logged and the remaining axes are still driven.
    pub fn tick(&self) {
        if !self.is_enabled() {
            return;
        }
        self.scheduler.arm(self.period);

        for (slot, axis) in self.config.axes.active() {
            let command = self.commands.take(slot);
            let steps = command_to_steps(
                self.config.hardware_frequency,
                self.config.ui_frequency,
                command,
            );
            if steps.is_zero() {
                continue;
            }

            debug!(axis, command = command.value(), steps = steps.0, "dispatch");
            if let Err(e) = self.device().move_steps(axis, steps) {
                warn!(axis, steps = steps.0, error = %e, "step command failed");
            }
        }
    }

    /// Play the greeting tune on the first driven axis, then restore the
    /// hardware frequency.
    pub fn play_greeting(&self) -> Result<()> {
        self.play_greeting_with(&mut StdDelay)
    }

    /// [`play_greeting`](Self::play_greeting) with a caller-supplied delay.
    pub fn play_greeting_with<W: DelayNs>(&self, delay: &mut W) -> Result<()> {
        let Some(axis) = self.config.axes.first() else {
            warn!("no driven axis to play on");
            return Ok(());
        };

        info!(axis, "playing greeting");
        let mut device = self.device();
        let played = melody::play(&mut *device, axis, melody::greeting(), delay);
        let restored = device.set_frequency(axis, self.config.hardware_frequency);
        played?;
        restored
    }

    /// Loop configuration.
    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Run `f` with exclusive access to the device.
    pub fn with_device<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(&mut self.device())
    }

    /// Disable the loop, stopping every axis.
    pub fn deactivate(&self) -> Result<()> {
        self.stop()
    }

    fn device(&self) -> MutexGuard<'_, D> {
        self.device.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<D> AxisDriveLoop<D, ThreadTimer>
where
    D: StepperDevice + Send + 'static,
{
    /// Create a stopped loop ticking on its own timer thread.
    ///
    /// The timer holds only a weak reference; dropping the last `Arc` shuts
    /// the thread down.
    ///
    /// # Errors
    ///
    /// Invalid configuration, checked before the timer thread starts, or a
    /// failure to spawn that thread.
    pub fn spawn(config: LoopConfig, device: D) -> Result<Arc<Self>> {
        validate_drive(&config)?;
        let timer = ThreadTimer::spawn("axis-drive")?;
        let drive = Arc::new(Self::new(config, device, timer)?);

        let weak = Arc::downgrade(&drive);
        drive.scheduler.bind(move || {
            if let Some(drive) = weak.upgrade() {
                drive.tick();
            }
        });
        Ok(drive)
    }

    /// Spawn, configure the axes and start ticking.
    ///
    /// # Errors
    ///
    /// Invalid configuration, before anything is sent to the device, or
    /// axis setup failures; the loop is dropped and the device released.
    pub fn activate(config: LoopConfig, device: D) -> Result<Arc<Self>> {
        let drive = Self::spawn(config, device)?;
        drive.setup_axes()?;
        drive.start();
        info!("drive loop activated");
        Ok(drive)
    }
}

impl<D, S> CommandSink for AxisDriveLoop<D, S>
where
    D: StepperDevice + Send,
    S: Scheduler,
{
    fn set_axis_command(&self, axis: &str, value: f32) {
        AxisDriveLoop::set_axis_command(self, axis, value)
    }
}
