//! XInput controller access through a host-supplied backend.

use core::fmt::Write;

use heapless::String;

use super::layout::XINPUT_STATE_SIZE;
use super::state::GamepadState;
use crate::error::{ConfigError, Error, GamepadError, Result};

/// `ERROR_SUCCESS`.
pub const STATUS_SUCCESS: u32 = 0x0000_0000;

/// `ERROR_DEVICE_NOT_CONNECTED`.
pub const STATUS_NOT_CONNECTED: u32 = 0x0000_048F;

/// `XINPUT_FLAG_GAMEPAD`.
pub const FLAG_GAMEPAD: u32 = 0x0000_0001;

/// XInput supports controller indices 0 to 3.
pub const MAX_CONTROLLER_ID: u8 = 3;

/// The two XInput entry points the gamepad needs.
///
/// Implementations wrap `XInputGetState` and `XInputGetCapabilities` and
/// return their status codes unchanged.
pub trait XInputBackend {
    /// Fill `state` with the raw `XINPUT_STATE` of controller `user_index`.
    fn get_state(&mut self, user_index: u32, state: &mut [u8; XINPUT_STATE_SIZE]) -> u32;

    /// Query capabilities of controller `user_index`.
    fn get_capabilities(&mut self, user_index: u32, flags: u32) -> u32;
}

/// Anything that yields gamepad samples.
pub trait GamepadSource {
    /// Human-readable identifier.
    fn name(&self) -> String<32>;

    /// Whether the controller answers.
    fn is_connected(&mut self) -> bool;

    /// Read one sample.
    fn read_state(&mut self) -> Result<GamepadState>;
}

impl<G: GamepadSource + ?Sized> GamepadSource for &mut G {
    fn name(&self) -> String<32> {
        (**self).name()
    }

    fn is_connected(&mut self) -> bool {
        (**self).is_connected()
    }

    fn read_state(&mut self) -> Result<GamepadState> {
        (**self).read_state()
    }
}

/// XInput controller at a fixed index.
pub struct XInputGamepad<B> {
    backend: B,
    id: u8,
}

impl<B: XInputBackend> XInputGamepad<B> {
    /// Controller `id` behind `backend`.
    ///
    /// # Errors
    ///
    /// `ConfigError::InvalidJoystickId` for an index above 3.
    pub fn new(backend: B, id: u8) -> Result<Self> {
        if id > MAX_CONTROLLER_ID {
            return Err(Error::Config(ConfigError::InvalidJoystickId(id)));
        }
        Ok(Self { backend, id })
    }

    /// Controller index.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// Give back the backend.
    pub fn into_backend(self) -> B {
        self.backend
    }
}

impl<B: XInputBackend> GamepadSource for XInputGamepad<B> {
    fn name(&self) -> String<32> {
        let mut name = String::new();
        let _ = write!(name, "xinput controller #{}", self.id);
        name
    }

    fn is_connected(&mut self) -> bool {
        self.backend.get_capabilities(u32::from(self.id), FLAG_GAMEPAD) == STATUS_SUCCESS
    }

    fn read_state(&mut self) -> Result<GamepadState> {
        let mut raw = [0u8; XINPUT_STATE_SIZE];
        match self.backend.get_state(u32::from(self.id), &mut raw) {
            STATUS_SUCCESS => Ok(GamepadState::decode(&raw)?),
            STATUS_NOT_CONNECTED => Err(Error::Gamepad(GamepadError::NotConnected(self.id))),
            status => Err(Error::Gamepad(GamepadError::Status(status))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamepad::{Button, GamepadAxis};

    struct Fake {
        status: u32,
        raw: [u8; XINPUT_STATE_SIZE],
        last_index: Option<u32>,
    }

    impl XInputBackend for Fake {
        fn get_state(&mut self, user_index: u32, state: &mut [u8; XINPUT_STATE_SIZE]) -> u32 {
            self.last_index = Some(user_index);
            *state = self.raw;
            self.status
        }

        fn get_capabilities(&mut self, _user_index: u32, flags: u32) -> u32 {
            assert_eq!(flags, FLAG_GAMEPAD);
            self.status
        }
    }

    fn fake(status: u32) -> Fake {
        let mut raw = [0u8; XINPUT_STATE_SIZE];
        raw[4..6].copy_from_slice(&0x1000u16.to_le_bytes());
        raw[8..10].copy_from_slice(&(-32767i16).to_le_bytes());
        Fake {
            status,
            raw,
            last_index: None,
        }
    }

    #[test]
    fn test_read_state() {
        let mut pad = XInputGamepad::new(fake(STATUS_SUCCESS), 2).unwrap();

        assert!(pad.is_connected());
        assert_eq!(pad.name().as_str(), "xinput controller #2");

        let state = pad.read_state().unwrap();
        assert_eq!(state.axis(GamepadAxis::LeftHorizontal), -1.0);
        assert!(state.pressed(Button::RightDown));
        assert_eq!(pad.into_backend().last_index, Some(2));
    }

    #[test]
    fn test_status_codes() {
        let mut pad = XInputGamepad::new(fake(STATUS_NOT_CONNECTED), 1).unwrap();
        assert!(!pad.is_connected());
        assert_eq!(
            pad.read_state(),
            Err(Error::Gamepad(GamepadError::NotConnected(1)))
        );

        let mut pad = XInputGamepad::new(fake(5), 0).unwrap();
        assert_eq!(pad.read_state(), Err(Error::Gamepad(GamepadError::Status(5))));
    }

    #[test]
    fn test_index_limit() {
        assert!(matches!(
            XInputGamepad::new(fake(STATUS_SUCCESS), 4),
            Err(Error::Config(ConfigError::InvalidJoystickId(4)))
        ));
    }
}
