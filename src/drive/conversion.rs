//! Analog command to step count conversion.

use libm::truncf;

use crate::config::units::{AnalogCommand, Hertz, Steps};

/// Steps issued for one tick of a command.
///
/// `trunc(hardware_frequency / ui_frequency * command)`. Truncation is toward
/// zero so small commands of either sign give zero steps.
#[inline]
pub fn command_to_steps(
    hardware_frequency: Hertz,
    ui_frequency: Hertz,
    command: AnalogCommand,
) -> Steps {
    let steps = hardware_frequency.0 / ui_frequency.0 * command.value();
    Steps(truncf(steps) as i64)
}

/// Delay between ticks in whole milliseconds (`1000 / ui_frequency`,
/// truncated, at least 1 ms).
#[inline]
pub fn tick_period_ms(ui_frequency: Hertz) -> u64 {
    let ms = truncf(1000.0 / ui_frequency.0);
    if ms >= 1.0 {
        ms as u64
    } else {
        1
    }
}
