//! `XINPUT_STATE` wire layout.
//!
//! The structure filled by `XInputGetState` is 16 bytes, little-endian, with
//! no padding:
//!
//! ```text
//! offset  width  field
//!      0      4  dwPacketNumber   u32
//!      4      2  wButtons         u16
//!      6      1  bLeftTrigger     u8
//!      7      1  bRightTrigger    u8
//!      8      2  sThumbLX         i16
//!     10      2  sThumbLY         i16
//!     12      2  sThumbRX         i16
//!     14      2  sThumbRY         i16
//! ```

/// Size of `XINPUT_STATE` in bytes.
pub const XINPUT_STATE_SIZE: usize = 16;

/// Integer type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Width {
    /// `BYTE`
    U8,
    /// `WORD`
    U16,
    /// `SHORT`
    I16,
    /// `DWORD`
    U32,
}

impl Width {
    /// Size in bytes.
    pub const fn bytes(self) -> usize {
        match self {
            Width::U8 => 1,
            Width::U16 | Width::I16 => 2,
            Width::U32 => 4,
        }
    }
}

/// One field of a fixed-layout structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Native field name.
    pub name: &'static str,
    /// Byte offset from the start of the structure.
    pub offset: usize,
    /// Integer type.
    pub width: Width,
}

impl Field {
    const fn new(name: &'static str, offset: usize, width: Width) -> Self {
        Self {
            name,
            offset,
            width,
        }
    }

    /// First byte past the field.
    pub const fn end(&self) -> usize {
        self.offset + self.width.bytes()
    }

    /// Read the field from `buf`, sign-extended for `I16`.
    ///
    /// `None` if `buf` is too short.
    pub fn read(&self, buf: &[u8]) -> Option<i64> {
        let bytes = buf.get(self.offset..self.end())?;
        let value = match self.width {
            Width::U8 => i64::from(bytes[0]),
            Width::U16 => i64::from(u16::from_le_bytes([bytes[0], bytes[1]])),
            Width::I16 => i64::from(i16::from_le_bytes([bytes[0], bytes[1]])),
            Width::U32 => i64::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])),
        };
        Some(value)
    }
}

/// Incremented by the driver whenever the state changes.
pub const PACKET_NUMBER: Field = Field::new("dwPacketNumber", 0, Width::U32);
/// Button bitmask, see [`Buttons`](super::Buttons).
pub const BUTTONS: Field = Field::new("wButtons", 4, Width::U16);
/// 0 to 255.
pub const LEFT_TRIGGER: Field = Field::new("bLeftTrigger", 6, Width::U8);
/// 0 to 255.
pub const RIGHT_TRIGGER: Field = Field::new("bRightTrigger", 7, Width::U8);
/// Left stick, horizontal.
pub const THUMB_LX: Field = Field::new("sThumbLX", 8, Width::I16);
/// Left stick, vertical.
pub const THUMB_LY: Field = Field::new("sThumbLY", 10, Width::I16);
/// Right stick, horizontal.
pub const THUMB_RX: Field = Field::new("sThumbRX", 12, Width::I16);
/// Right stick, vertical.
pub const THUMB_RY: Field = Field::new("sThumbRY", 14, Width::I16);

/// Every field of `XINPUT_STATE`, in offset order.
pub const XINPUT_STATE: [Field; 8] = [
    PACKET_NUMBER,
    BUTTONS,
    LEFT_TRIGGER,
    RIGHT_TRIGGER,
    THUMB_LX,
    THUMB_LY,
    THUMB_RX,
    THUMB_RY,
];
