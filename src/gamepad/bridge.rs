//! Gamepad to drive loop bridge.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use heapless::Vec;
use tracing::{debug, info, warn};

use super::xinput::GamepadSource;
use crate::config::units::Hertz;
use crate::config::{AxisBinding, JoystickConfig, MAX_BINDINGS};
use crate::drive::{tick_period_ms, CommandSink};
use crate::error::{bounded, DeviceError, Error, Result};

/// Reads a gamepad and pushes the bound inputs as analog commands.
pub struct JoystickBridge<G> {
    gamepad: G,
    bindings: Vec<AxisBinding, MAX_BINDINGS>,
    connected: bool,
}

impl<G: GamepadSource> JoystickBridge<G> {
    /// Bridge pushing `bindings` in order.
    pub fn new(gamepad: G, bindings: Vec<AxisBinding, MAX_BINDINGS>) -> Self {
        Self {
            gamepad,
            bindings,
            connected: true,
        }
    }

    /// Bridge with the bindings of a joystick section.
    pub fn from_config(gamepad: G, config: &JoystickConfig) -> Self {
        Self::new(gamepad, config.bindings.clone())
    }

    /// Read the gamepad once and push every binding to `sink`.
    ///
    /// # Errors
    ///
    /// The gamepad read error; nothing is pushed in that case.
    pub fn poll_once<S: CommandSink + ?Sized>(&mut self, sink: &S) -> Result<()> {
        let state = self.gamepad.read_state()?;
        for binding in &self.bindings {
            let value = state.axis(binding.input);
            let value = if binding.invert { -value } else { value };
            sink.set_axis_command(&binding.axis, value);
        }
        Ok(())
    }

    /// Bindings in push order.
    pub fn bindings(&self) -> &[AxisBinding] {
        &self.bindings
    }

    /// Poll, logging connection changes instead of every failed read.
    fn poll_logged<S: CommandSink + ?Sized>(&mut self, sink: &S) {
        match self.poll_once(sink) {
            Ok(()) if !self.connected => {
                info!(gamepad = %self.gamepad.name(), "gamepad reconnected");
                self.connected = true;
            }
            Ok(()) => {}
            Err(e) if self.connected => {
                warn!(gamepad = %self.gamepad.name(), error = %e, "gamepad read failed");
                self.connected = false;
            }
            Err(e) => debug!(error = %e, "gamepad still unavailable"),
        }
    }
}

impl<G> JoystickBridge<G>
where
    G: GamepadSource + Send + 'static,
{
    /// Poll on a dedicated thread at `poll_frequency` until the handle is
    /// stopped or dropped.
    pub fn spawn<S>(mut self, sink: S, poll_frequency: Hertz) -> Result<BridgeHandle>
    where
        S: CommandSink + 'static,
    {
        let period = Duration::from_millis(tick_period_ms(poll_frequency));
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let worker = thread::Builder::new()
            .name("joystick-bridge".to_owned())
            .spawn(move || {
                info!(
                    gamepad = %self.gamepad.name(),
                    period_ms = period.as_millis() as u64,
                    "joystick bridge running"
                );
                while !stop_flag.load(Ordering::Acquire) {
                    self.poll_logged(&sink);
                    thread::sleep(period);
                }
                info!("joystick bridge stopped");
            })
            .map_err(|e| Error::Device(DeviceError::Io(bounded(&e.to_string()))))?;

        Ok(BridgeHandle {
            stop,
            worker: Some(worker),
        })
    }
}

/// Running bridge thread. Dropping the handle stops it.
pub struct BridgeHandle {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl BridgeHandle {
    /// Stop polling and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    /// Whether the polling thread is still alive.
    pub fn is_running(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GamepadError;
    use crate::gamepad::{GamepadAxis, GamepadState};
    use std::sync::Mutex;
    use tracing_test::traced_test;

    struct Scripted {
        samples: std::vec::Vec<Result<GamepadState>>,
    }

    impl GamepadSource for Scripted {
        fn name(&self) -> heapless::String<32> {
            bounded("scripted")
        }

        fn is_connected(&mut self) -> bool {
            true
        }

        fn read_state(&mut self) -> Result<GamepadState> {
            if self.samples.len() > 1 {
                self.samples.remove(0)
            } else {
                self.samples[0].clone()
            }
        }
    }

    #[derive(Default)]
    struct Sink(Mutex<std::vec::Vec<(String, f32)>>);

    impl CommandSink for Sink {
        fn set_axis_command(&self, axis: &str, value: f32) {
            self.0.lock().unwrap().push((axis.to_owned(), value));
        }
    }

    fn bindings() -> Vec<AxisBinding, MAX_BINDINGS> {
        let mut b = Vec::new();
        let x = AxisBinding::new(GamepadAxis::LeftHorizontal, "x").unwrap();
        let y = AxisBinding::new(GamepadAxis::LeftVertical, "y").unwrap();
        b.push(x).unwrap();
        b.push(y.inverted(true)).unwrap();
        b
    }

    fn sample(lx: f32, ly: f32) -> GamepadState {
        GamepadState {
            left_horizontal: lx,
            left_vertical: ly,
            ..GamepadState::default()
        }
    }

    #[test]
    fn test_poll_pushes_bindings() {
        let pad = Scripted {
            samples: vec![Ok(sample(0.5, 0.25))],
        };
        let mut bridge = JoystickBridge::new(pad, bindings());
        let sink = Sink::default();

        bridge.poll_once(&sink).unwrap();

        assert_eq!(
            *sink.0.lock().unwrap(),
            [("x".to_string(), 0.5), ("y".to_string(), -0.25)]
        );
    }

    #[test]
    #[traced_test]
    fn test_read_failure_logged_once() {
        let pad = Scripted {
            samples: vec![
                Err(Error::Gamepad(GamepadError::NotConnected(0))),
                Err(Error::Gamepad(GamepadError::NotConnected(0))),
                Ok(sample(0.1, 0.0)),
            ],
        };
        let mut bridge = JoystickBridge::new(pad, bindings());
        let sink = Sink::default();

        bridge.poll_logged(&sink);
        bridge.poll_logged(&sink);
        assert!(sink.0.lock().unwrap().is_empty());
        bridge.poll_logged(&sink);

        assert_eq!(sink.0.lock().unwrap().len(), 2);
        assert!(logs_contain("gamepad read failed"));
        assert!(logs_contain("gamepad reconnected"));
    }

    #[test]
    fn test_spawned_bridge_stops() {
        let pad = Scripted {
            samples: vec![Ok(sample(1.0, 0.0))],
        };
        let sink = Arc::new(Sink::default());
        let handle = JoystickBridge::new(pad, bindings())
            .spawn(Arc::clone(&sink), Hertz(200.0))
            .unwrap();

        thread::sleep(Duration::from_millis(50));
        assert!(handle.is_running());
        handle.stop();

        let pushed = sink.0.lock().unwrap().len();
        assert!(pushed >= 2);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(sink.0.lock().unwrap().len(), pushed);
    }
}
