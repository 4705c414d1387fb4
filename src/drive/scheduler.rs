//! Single-shot, re-armable delayed task.
//!
//! The drive loop re-arms its timer at the start of every tick instead of
//! running on a fixed-rate timer, so a slow device never builds a backlog
//! of ticks.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{bounded, DeviceError, Error, Result};

/// A cancellable single-shot timer.
///
/// `arm` replaces any pending deadline; `cancel` clears it. The callback
/// fires at most once per `arm`.
pub trait Scheduler: Send + Sync {
    /// Fire once after `delay`.
    fn arm(&self, delay: Duration);

    /// Drop the pending deadline, if any.
    fn cancel(&self);
}

type Callback = Box<dyn FnMut() + Send>;

struct TimerState {
    deadline: Option<Instant>,
    shutdown: bool,
}

struct TimerShared {
    state: Mutex<TimerState>,
    wake: Condvar,
    callback: Mutex<Option<Callback>>,
}

impl TimerShared {
    fn state(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// [`Scheduler`] backed by one worker thread.
///
/// The callback runs on the worker thread; it may call `arm` and `cancel`.
/// Dropping the timer stops the worker.
pub struct ThreadTimer {
    shared: Arc<TimerShared>,
    worker: Option<JoinHandle<()>>,
}

impl ThreadTimer {
    /// Start the worker thread. Nothing fires until a callback is bound and
    /// the timer is armed.
    pub fn spawn(name: &str) -> Result<Self> {
        let shared = Arc::new(TimerShared {
            state: Mutex::new(TimerState {
                deadline: None,
                shutdown: false,
            }),
            wake: Condvar::new(),
            callback: Mutex::new(None),
        });

        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name(name.to_owned())
            .spawn(move || run(&worker_shared))
            .map_err(|e| Error::Device(DeviceError::Io(bounded(&e.to_string()))))?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Install the function run on every expiry.
    pub fn bind<F>(&self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        *self
            .shared
            .callback
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Box::new(callback));
    }
}

impl Scheduler for ThreadTimer {
    fn arm(&self, delay: Duration) {
        self.shared.state().deadline = Some(Instant::now() + delay);
        self.shared.wake.notify_one();
    }

    fn cancel(&self) {
        self.shared.state().deadline = None;
        self.shared.wake.notify_one();
    }
}

impl Drop for ThreadTimer {
    fn drop(&mut self) {
        self.shared.state().shutdown = true;
        self.shared.wake.notify_one();
        if let Some(worker) = self.worker.take() {
            // Dropped from inside the callback: the worker exits on its own.
            if worker.thread().id() != thread::current().id() {
                let _ = worker.join();
            }
        }
    }
}

fn run(shared: &TimerShared) {
    let mut state = shared.state();
    loop {
        if state.shutdown {
            debug!("timer worker stopping");
            return;
        }

        match state.deadline {
            None => {
                state = shared.wake.wait(state).unwrap_or_else(PoisonError::into_inner);
            }
            Some(deadline) => {
                let now = Instant::now();
                if now < deadline {
                    state = shared
                        .wake
                        .wait_timeout(state, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0;
                    continue;
                }

                state.deadline = None;
                drop(state);
                if let Some(callback) = shared
                    .callback
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .as_mut()
                {
                    callback();
                }
                state = shared.state();
            }
        }
    }
}
