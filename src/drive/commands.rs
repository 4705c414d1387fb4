//! Per-axis pending analog commands.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::units::AnalogCommand;
use crate::config::MAX_AXES;

/// Latest command per axis slot, each behind its own lock.
///
/// Locks are held only for the read or write itself, never across device
/// I/O.
#[derive(Debug, Default)]
pub struct PendingCommands {
    slots: [Mutex<AnalogCommand>; MAX_AXES],
}

impl PendingCommands {
    /// All slots at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the pending command of a slot.
    ///
    /// Out-of-bounds slots are ignored.
    pub fn store(&self, slot: usize, command: AnalogCommand) {
        if let Some(mut pending) = self.slot(slot) {
            *pending = command;
        }
    }

    /// Read the pending command of a slot and reset it to zero.
    pub fn take(&self, slot: usize) -> AnalogCommand {
        self.slot(slot)
            .map(|mut pending| core::mem::replace(&mut *pending, AnalogCommand::ZERO))
            .unwrap_or(AnalogCommand::ZERO)
    }

    /// Read the pending command of a slot without consuming it.
    pub fn peek(&self, slot: usize) -> AnalogCommand {
        self.slot(slot).map(|pending| *pending).unwrap_or(AnalogCommand::ZERO)
    }

    fn slot(&self, slot: usize) -> Option<MutexGuard<'_, AnalogCommand>> {
        self.slots
            .get(slot)
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_resets() {
        let commands = PendingCommands::new();
        commands.store(1, AnalogCommand::new(0.25).unwrap());

        assert_eq!(commands.peek(1).value(), 0.25);
        assert_eq!(commands.take(1).value(), 0.25);
        assert_eq!(commands.take(1).value(), 0.0);
        assert_eq!(commands.peek(0).value(), 0.0);
    }

    #[test]
    fn test_out_of_bounds_slot() {
        let commands = PendingCommands::new();
        commands.store(MAX_AXES, AnalogCommand::new(1.0).unwrap());
        assert_eq!(commands.take(MAX_AXES).value(), 0.0);
    }
}
