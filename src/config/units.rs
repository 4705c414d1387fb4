//! Unit types for physical quantities.
//!
//! Provides type-safe representations of frequencies, voltages, step counts
//! and normalized analog commands to prevent unit confusion at compile time.

use core::ops::{Add, Neg};

use serde::Deserialize;

use crate::error::CommandError;

/// Frequency in hertz.
///
/// Used both for the UI sampling rate and for the device step clock.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Hertz(pub f32);

impl Hertz {
    /// Create a new Hertz value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Finite and strictly positive.
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Period of one cycle in nanoseconds (saturating, `u32::MAX` for 0 Hz).
    #[inline]
    pub fn period_ns(self) -> u32 {
        if !self.is_positive() {
            return u32::MAX;
        }
        let ns = 1.0e9 / self.0;
        if ns >= u32::MAX as f32 {
            u32::MAX
        } else {
            ns as u32
        }
    }
}

/// Drive voltage in volts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Volts(pub f32);

impl Volts {
    /// Create a new Volts value.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }
}

/// Signed motor step count.
///
/// Positive moves step "up", negative moves step "down".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Steps(pub i64);

impl Steps {
    /// Zero steps.
    pub const ZERO: Self = Self(0);

    /// Create a new Steps value.
    #[inline]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Get absolute value as u64.
    #[inline]
    pub fn abs(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Whether this is a zero-length move.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Add for Steps {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Neg for Steps {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

/// Normalized analog command in `[-1.0, 1.0]`.
///
/// Validated at construction; out-of-range values and NaN are rejected
/// rather than clamped.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnalogCommand(f32);

impl AnalogCommand {
    /// Neutral (no motion) command.
    pub const ZERO: Self = Self(0.0);
    /// Lower bound.
    pub const MIN: f32 = -1.0;
    /// Upper bound.
    pub const MAX: f32 = 1.0;

    /// Create a new command with validation.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::OutOfRange` if the value is outside `[-1.0, 1.0]`.
    pub fn new(value: f32) -> Result<Self, CommandError> {
        if Self::is_valid(value) {
            Ok(Self(value))
        } else {
            Err(CommandError::OutOfRange(value))
        }
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f32 {
        self.0
    }

    /// Check if a value is a valid command.
    #[inline]
    pub fn is_valid(value: f32) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}

/// Closed interval `[min, max]`, written as `[min, max]` in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ValueRange(pub f32, pub f32);

impl ValueRange {
    /// Create a new range.
    #[inline]
    pub const fn new(min: f32, max: f32) -> Self {
        Self(min, max)
    }

    /// Lower bound.
    #[inline]
    pub const fn min(self) -> f32 {
        self.0
    }

    /// Upper bound.
    #[inline]
    pub const fn max(self) -> f32 {
        self.1
    }

    /// Check the range is ordered (min <= max).
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 <= self.1
    }

    /// Check if a value lies within the range (inclusive).
    #[inline]
    pub fn contains(self, value: f32) -> bool {
        value >= self.0 && value <= self.1
    }
}
