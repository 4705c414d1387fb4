//! Decoded gamepad state.

use bitflags::bitflags;
use serde::Deserialize;

use super::layout::{
    BUTTONS, LEFT_TRIGGER, PACKET_NUMBER, RIGHT_TRIGGER, THUMB_LX, THUMB_LY, THUMB_RX, THUMB_RY,
    XINPUT_STATE_SIZE,
};
use crate::error::GamepadError;

/// Full-scale thumbstick reading.
pub const STICK_MAX: f32 = 32767.0;

/// Full-scale trigger reading.
pub const TRIGGER_MAX: f32 = 255.0;

bitflags! {
    /// XInput `wButtons` masks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Buttons: u16 {
        /// D-pad up.
        const DPAD_UP        = 0x0001;
        /// D-pad down.
        const DPAD_DOWN      = 0x0002;
        /// D-pad left.
        const DPAD_LEFT      = 0x0004;
        /// D-pad right.
        const DPAD_RIGHT     = 0x0008;
        /// Start.
        const START          = 0x0010;
        /// Back.
        const BACK           = 0x0020;
        /// Left stick click.
        const LEFT_THUMB     = 0x0040;
        /// Right stick click.
        const RIGHT_THUMB    = 0x0080;
        /// Left bumper.
        const LEFT_SHOULDER  = 0x0100;
        /// Right bumper.
        const RIGHT_SHOULDER = 0x0200;
        /// A (bottom face button).
        const A              = 0x1000;
        /// B (right face button).
        const B              = 0x2000;
        /// X (left face button).
        const X              = 0x4000;
        /// Y (top face button).
        const Y              = 0x8000;
    }
}

/// Controller-agnostic button names.
///
/// The left cluster is the d-pad, the right cluster the face buttons, the
/// middle pair back/start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// D-pad up
    LeftUp,
    /// D-pad down
    LeftDown,
    /// D-pad left
    LeftLeft,
    /// D-pad right
    LeftRight,
    /// Left stick click
    LeftJoystick,
    /// Y
    RightUp,
    /// A
    RightDown,
    /// X
    RightLeft,
    /// B
    RightRight,
    /// Right stick click
    RightJoystick,
    /// Back
    MiddleLeft,
    /// Start
    MiddleRight,
    /// Left bumper
    LeftShoulder,
    /// Right bumper
    RightShoulder,
}

impl Button {
    /// Every button, in declaration order.
    pub const ALL: [Button; 14] = [
        Button::LeftUp,
        Button::LeftDown,
        Button::LeftLeft,
        Button::LeftRight,
        Button::LeftJoystick,
        Button::RightUp,
        Button::RightDown,
        Button::RightLeft,
        Button::RightRight,
        Button::RightJoystick,
        Button::MiddleLeft,
        Button::MiddleRight,
        Button::LeftShoulder,
        Button::RightShoulder,
    ];

    /// XInput mask of the button.
    pub const fn mask(self) -> Buttons {
        match self {
            Button::LeftUp => Buttons::DPAD_UP,
            Button::LeftDown => Buttons::DPAD_DOWN,
            Button::LeftLeft => Buttons::DPAD_LEFT,
            Button::LeftRight => Buttons::DPAD_RIGHT,
            Button::LeftJoystick => Buttons::LEFT_THUMB,
            Button::RightUp => Buttons::Y,
            Button::RightDown => Buttons::A,
            Button::RightLeft => Buttons::X,
            Button::RightRight => Buttons::B,
            Button::RightJoystick => Buttons::RIGHT_THUMB,
            Button::MiddleLeft => Buttons::BACK,
            Button::MiddleRight => Buttons::START,
            Button::LeftShoulder => Buttons::LEFT_SHOULDER,
            Button::RightShoulder => Buttons::RIGHT_SHOULDER,
        }
    }
}

/// Analog inputs of a gamepad.
///
/// Horizontal inputs read the `X` thumb fields (`sThumbLX` is
/// `left_horizontal`) and vertical inputs the `Y` fields. Front-ends that
/// label `sThumbLX` as the vertical axis use the opposite names; bindings
/// taken from them must swap horizontal and vertical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GamepadAxis {
    /// Left stick X, positive right.
    LeftHorizontal,
    /// Left stick Y, positive up.
    LeftVertical,
    /// Right stick X.
    RightHorizontal,
    /// Right stick Y.
    RightVertical,
    /// Left trigger, `[0.0, 1.0]`.
    LeftTrigger,
    /// Right trigger, `[0.0, 1.0]`.
    RightTrigger,
}

/// One gamepad sample.
///
/// Sticks are in `[-1.0, 1.0]`, triggers in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct GamepadState {
    /// Changes whenever the controller state changes.
    pub packet_number: u32,
    pub buttons: Buttons,
    pub left_horizontal: f32,
    pub left_vertical: f32,
    pub right_horizontal: f32,
    pub right_vertical: f32,
    pub left_trigger: f32,
    pub right_trigger: f32,
}

impl GamepadState {
    /// Decode a raw `XINPUT_STATE`.
    ///
    /// # Errors
    ///
    /// `GamepadError::ShortBuffer` if `raw` is under 16 bytes.
    pub fn decode(raw: &[u8]) -> Result<Self, GamepadError> {
        if raw.len() < XINPUT_STATE_SIZE {
            return Err(GamepadError::ShortBuffer(raw.len()));
        }
        let read = |field: super::layout::Field| field.read(raw).unwrap_or(0);
        let stick = |field| (read(field) as f32 / STICK_MAX).clamp(-1.0, 1.0);
        let trigger = |field| read(field) as f32 / TRIGGER_MAX;

        Ok(Self {
            packet_number: read(PACKET_NUMBER) as u32,
            buttons: Buttons::from_bits_retain(read(BUTTONS) as u16),
            left_horizontal: stick(THUMB_LX),
            left_vertical: stick(THUMB_LY),
            right_horizontal: stick(THUMB_RX),
            right_vertical: stick(THUMB_RY),
            left_trigger: trigger(LEFT_TRIGGER),
            right_trigger: trigger(RIGHT_TRIGGER),
        })
    }

    /// Value of one analog input.
    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        match axis {
            GamepadAxis::LeftHorizontal => self.left_horizontal,
            GamepadAxis::LeftVertical => self.left_vertical,
            GamepadAxis::RightHorizontal => self.right_horizontal,
            GamepadAxis::RightVertical => self.right_vertical,
            GamepadAxis::LeftTrigger => self.left_trigger,
            GamepadAxis::RightTrigger => self.right_trigger,
        }
    }

    /// Whether `button` is held.
    pub fn pressed(&self, button: Button) -> bool {
        self.buttons.contains(button.mask())
    }
}
