//! Unit tests for the STEP/DIR pulse device.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};
use stepper_jog::device::PulseStepper;
use stepper_jog::error::{DeviceError, Error};
use stepper_jog::{Hertz, StepperDevice, Steps};

/// Delay that records every requested wait in nanoseconds.
#[derive(Clone, Default)]
struct RecordingDelay(Rc<RefCell<Vec<u64>>>);

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(u64::from(ns));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.borrow_mut().push(u64::from(us) * 1_000);
    }
}

/// Test that steps are spaced by the frequency period minus the pulse width.
#[test]
fn test_step_spacing_follows_frequency() {
    let mut step = PinMock::new(&[
        Transaction::set(State::High),
        Transaction::set(State::Low),
        Transaction::set(State::High),
        Transaction::set(State::Low),
    ]);
    let mut dir = PinMock::new(&[Transaction::set(State::Low)]);
    // 500 Hz = 2 ms period, 2 us pulse
    let delay = RecordingDelay::default();

    let mut device = PulseStepper::new(delay.clone());
    device.add_axis("x", step.clone(), dir.clone(), false).unwrap();
    device.set_frequency("x", Hertz(500.0)).unwrap();
    device.move_steps("x", Steps(-2)).unwrap();

    assert_eq!(device.position("x"), Some(Steps(-2)));
    device.set_origin("x").unwrap();
    assert_eq!(device.position("x"), Some(Steps::ZERO));
    step.done();
    dir.done();
    assert_eq!(*delay.0.borrow(), [2_000, 1_998_000, 2_000]);
}

/// Test that a fourth axis is refused.
#[test]
fn test_axis_capacity() {
    let mut pins = Vec::new();
    let mut device = PulseStepper::new(NoopDelay::new());
    for name in ["x", "y", "z"] {
        let step = PinMock::new(&[]);
        let dir = PinMock::new(&[]);
        device.add_axis(name, step.clone(), dir.clone(), false).unwrap();
        pins.push((step, dir));
    }

    let mut step = PinMock::new(&[]);
    let mut dir = PinMock::new(&[]);
    assert_eq!(
        device.add_axis("w", step.clone(), dir.clone(), false),
        Err(Error::Device(DeviceError::AxisCapacityExceeded))
    );

    step.done();
    dir.done();
    for (mut step, mut dir) in pins {
        step.done();
        dir.done();
    }
}
