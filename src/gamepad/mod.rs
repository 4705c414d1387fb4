//! Gamepad input.
//!
//! XInput state decoding over a host-supplied backend, plus (std) a bridge
//! thread that forwards bound sticks and triggers to a drive loop.

#[cfg(feature = "std")]
mod bridge;
pub mod layout;
mod state;
mod xinput;

#[cfg(feature = "std")]
pub use bridge::{BridgeHandle, JoystickBridge};
pub use state::{Button, Buttons, GamepadAxis, GamepadState, STICK_MAX, TRIGGER_MAX};
pub use xinput::{
    GamepadSource, XInputBackend, XInputGamepad, FLAG_GAMEPAD, MAX_CONTROLLER_ID,
    STATUS_NOT_CONNECTED, STATUS_SUCCESS,
};
