//! Analog drive loop.
//!
//! Converts buffered per-axis analog commands in `[-1.0, 1.0]` into step
//! commands for a [`StepperDevice`](crate::device::StepperDevice).
//!
//! # Architecture
//!
//! ```text
//! input source ──set_axis_command──▶ PendingCommands (lock per axis)
//!                                           │ take (read + reset)
//!                   Scheduler ──tick──▶ AxisDriveLoop ──move_steps──▶ device
//!                       ▲                   │
//!                       └──── arm ──────────┘
//! ```
//!
//! The scheduler is a single-shot timer re-armed at the start of each tick,
//! so ticks never queue up behind a slow device.

mod conversion;
pub mod melody;

#[cfg(feature = "std")]
mod commands;
#[cfg(feature = "std")]
mod drive_loop;
#[cfg(feature = "std")]
mod scheduler;

pub use conversion::{command_to_steps, tick_period_ms};

#[cfg(feature = "std")]
pub use commands::PendingCommands;
#[cfg(feature = "std")]
pub use drive_loop::{AxisDriveLoop, CommandSink};
#[cfg(feature = "std")]
pub use scheduler::{Scheduler, ThreadTimer};
