//! Axis identifiers and the fixed set of driven axis slots.

use core::fmt;

use heapless::String;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;

use crate::error::{self, bounded, ConfigError, Error};

/// Maximum number of independently driven axes.
pub const MAX_AXES: usize = 3;

/// Axis name, e.g. `"x"` (max 16 chars).
pub type AxisId = String<16>;

/// Ordered axis slots; `None` marks a disabled slot.
///
/// In TOML the slots are a list of at most three names, where an empty
/// string disables a slot and missing trailing entries are disabled:
///
/// ```toml
/// axes = ["x", "", "z"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisSlots([Option<AxisId>; MAX_AXES]);

impl AxisSlots {
    /// No axes enabled.
    pub const fn empty() -> Self {
        Self([None, None, None])
    }

    /// Build slots from names, `None` or `""` disabling a slot.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidAxisName` for a name longer than 16 chars.
    pub fn from_names(names: [Option<&str>; MAX_AXES]) -> error::Result<Self> {
        let mut slots = Self::empty();
        for (slot, name) in slots.0.iter_mut().zip(names) {
            *slot = match name.filter(|n| !n.is_empty()) {
                Some(n) => Some(axis_id(n)?),
                None => None,
            };
        }
        Ok(slots)
    }

    /// Slot contents in order.
    pub fn slots(&self) -> &[Option<AxisId>; MAX_AXES] {
        &self.0
    }

    /// Active axes with their slot index, in slot order.
    pub fn active(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|id| (i, id.as_str())))
    }

    /// Slot index of a named axis.
    pub fn index_of(&self, axis: &str) -> Option<usize> {
        self.active().find(|(_, id)| *id == axis).map(|(i, _)| i)
    }

    /// Whether the axis is driven.
    pub fn contains(&self, axis: &str) -> bool {
        self.index_of(axis).is_some()
    }

    /// First active axis, if any.
    pub fn first(&self) -> Option<&str> {
        self.active().next().map(|(_, id)| id)
    }

    /// Number of active axes.
    pub fn active_count(&self) -> usize {
        self.active().count()
    }
}

/// Checked conversion of a name into an [`AxisId`].
///
/// # Errors
///
/// `ConfigError::InvalidAxisName` for a name longer than 16 chars.
pub fn axis_id(name: &str) -> error::Result<AxisId> {
    AxisId::try_from(name).map_err(|_| Error::Config(ConfigError::InvalidAxisName(bounded(name))))
}

impl Default for AxisSlots {
    fn default() -> Self {
        Self([Some(bounded("x")), Some(bounded("y")), None])
    }
}

impl<'de> Deserialize<'de> for AxisSlots {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SlotsVisitor;

        impl<'de> Visitor<'de> for SlotsVisitor {
            type Value = AxisSlots;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a list of at most {} axis names", MAX_AXES)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut slots = AxisSlots::empty();
                let mut count = 0;
                while let Some(name) = seq.next_element::<String<32>>()? {
                    if count >= MAX_AXES {
                        return Err(de::Error::invalid_length(count + 1, &self));
                    }
                    if !name.is_empty() {
                        let id = AxisId::try_from(name.as_str()).map_err(|_| {
                            de::Error::invalid_value(
                                de::Unexpected::Str(name.as_str()),
                                &"an axis name of at most 16 chars",
                            )
                        })?;
                        slots.0[count] = Some(id);
                    }
                    count += 1;
                }
                Ok(slots)
            }
        }

        deserializer.deserialize_seq(SlotsVisitor)
    }
}
