//! Shared test doubles: a device that records every call and a scheduler
//! driven by hand.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use stepper_jog::error::{DeviceError, Error};
use stepper_jog::{Hertz, Result, Scheduler, StepperDevice, Steps, Volts};

/// One device call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Frequency(String, f32),
    Voltage(String, f32),
    Move(String, i64),
    StopAll,
}

/// Records calls into a shared log; optionally fails moves on one axis.
#[derive(Debug, Clone, Default)]
pub struct RecordingDevice {
    log: Arc<Mutex<Vec<Call>>>,
    failing_axis: Option<String>,
}

impl RecordingDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(axis: &str) -> Self {
        Self {
            failing_axis: Some(axis.to_owned()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().unwrap().clone()
    }

    pub fn moves(&self) -> Vec<(String, i64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Move(axis, steps) => Some((axis, steps)),
                _ => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::StopAll).count()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.log.lock().unwrap().push(call);
    }
}

impl StepperDevice for RecordingDevice {
    fn set_frequency(&mut self, axis: &str, frequency: Hertz) -> Result<()> {
        self.record(Call::Frequency(axis.to_owned(), frequency.value()));
        Ok(())
    }

    fn set_voltage(&mut self, axis: &str, voltage: Volts) -> Result<()> {
        self.record(Call::Voltage(axis.to_owned(), voltage.value()));
        Ok(())
    }

    fn move_steps(&mut self, axis: &str, steps: Steps) -> Result<()> {
        self.record(Call::Move(axis.to_owned(), steps.value()));
        if self.failing_axis.as_deref() == Some(axis) {
            return Err(Error::Device(DeviceError::Timeout));
        }
        Ok(())
    }

    fn stop_all(&mut self) -> Result<()> {
        self.record(Call::StopAll);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ManualState {
    armed: Option<Duration>,
    arm_count: usize,
    cancel_count: usize,
}

/// Scheduler that only records; tests call `tick()` themselves.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay of the pending deadline, if armed.
    pub fn armed(&self) -> Option<Duration> {
        self.state.lock().unwrap().armed
    }

    pub fn arm_count(&self) -> usize {
        self.state.lock().unwrap().arm_count
    }

    pub fn cancel_count(&self) -> usize {
        self.state.lock().unwrap().cancel_count
    }

    /// Consume the pending deadline as if it fired.
    pub fn fire(&self) -> bool {
        self.state.lock().unwrap().armed.take().is_some()
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&self, delay: Duration) {
        let mut state = self.state.lock().unwrap();
        state.armed = Some(delay);
        state.arm_count += 1;
    }

    fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        state.armed = None;
        state.cancel_count += 1;
    }
}
