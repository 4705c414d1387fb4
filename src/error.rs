//! Error types for stepper-jog.
//!
//! Provides unified error handling across configuration, analog commands,
//! stepper devices and gamepad input.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all stepper-jog operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Analog command rejected
    Command(CommandError),
    /// Stepper device rejected or failed a command
    Device(DeviceError),
    /// Gamepad read error
    Gamepad(GamepadError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// UI sampling frequency must be finite and > 0
    InvalidUiFrequency(f32),
    /// Hardware step clock must be finite and > 0
    InvalidHardwareFrequency(f32),
    /// Drive voltage must be finite
    InvalidVoltage(f32),
    /// More axis slots than the loop supports
    TooManyAxes(usize),
    /// Axis name empty or longer than the allowed length
    InvalidAxisName(heapless::String<32>),
    /// Same axis name used twice
    DuplicateAxis(heapless::String<16>),
    /// Same controller channel id used by two axes
    DuplicateAxisId(u8),
    /// Range with min > max
    InvalidRange {
        /// Minimum bound
        min: f32,
        /// Maximum bound
        max: f32,
    },
    /// Configured default lies outside its allowed range
    DefaultOutOfRange {
        /// Axis name
        axis: heapless::String<16>,
        /// Offending value
        value: f32,
    },
    /// Ethernet interface selected without a host
    MissingHost,
    /// Interface type recognised but not supported
    UnsupportedInterface(heapless::String<16>),
    /// Drive axis missing from the stepper controller configuration
    UnknownStepperAxis(heapless::String<16>),
    /// Joystick binding targets an axis the drive loop does not drive
    UnknownDriveAxis(heapless::String<16>),
    /// XInput supports controllers 0 to 3
    InvalidJoystickId(u8),
    /// Joystick polling rate must be finite and > 0
    InvalidPollFrequency(f32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Analog command errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// Analog value outside [-1.0, 1.0]
    OutOfRange(f32),
    /// Axis is not one of the driven axes
    UnknownAxis(heapless::String<16>),
}

/// Stepper device errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceError {
    /// Axis not known to the device
    UnknownAxis(heapless::String<16>),
    /// Value outside the axis' allowed range
    OutOfRange {
        /// Requested value
        value: f32,
        /// Minimum allowed value
        min: f32,
        /// Maximum allowed value
        max: f32,
    },
    /// Controller answered with an error
    Rejected {
        /// Command that was sent
        command: heapless::String<32>,
        /// Controller response
        response: heapless::String<64>,
    },
    /// Controller answer could not be interpreted
    UnexpectedResponse(heapless::String<64>),
    /// No answer within the read timeout
    Timeout,
    /// Connection closed by the controller
    ConnectionClosed,
    /// Transport I/O error
    Io(heapless::String<64>),
    /// Controller refused the password
    AuthenticationFailed,
    /// GPIO pin operation failed
    PinError,
    /// No free channel slot
    AxisCapacityExceeded,
}

/// Gamepad errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GamepadError {
    /// No controller at this index
    NotConnected(u8),
    /// Backend returned a non-success status code
    Status(u32),
    /// State buffer shorter than the fixed layout
    ShortBuffer(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Command(e) => write!(f, "Command error: {}", e),
            Error::Device(e) => write!(f, "Device error: {}", e),
            Error::Gamepad(e) => write!(f, "Gamepad error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidUiFrequency(v) => {
                write!(f, "Invalid UI frequency: {} Hz. Must be > 0", v)
            }
            ConfigError::InvalidHardwareFrequency(v) => {
                write!(f, "Invalid hardware frequency: {} Hz. Must be > 0", v)
            }
            ConfigError::InvalidVoltage(v) => write!(f, "Invalid voltage: {} V", v),
            ConfigError::TooManyAxes(n) => write!(f, "Too many axes: {} (max 3)", n),
            ConfigError::InvalidAxisName(name) => write!(f, "Invalid axis name: '{}'", name),
            ConfigError::DuplicateAxis(name) => write!(f, "Duplicate axis: '{}'", name),
            ConfigError::DuplicateAxisId(id) => write!(f, "Duplicate controller axis id: {}", id),
            ConfigError::InvalidRange { min, max } => {
                write!(f, "Invalid range: min ({}) must be <= max ({})", min, max)
            }
            ConfigError::DefaultOutOfRange { axis, value } => {
                write!(f, "Default value {} of axis '{}' is out of range", value, axis)
            }
            ConfigError::MissingHost => {
                write!(f, "Ethernet connection required but no host specified")
            }
            ConfigError::UnsupportedInterface(kind) => {
                write!(f, "Unsupported interface type: '{}'", kind)
            }
            ConfigError::UnknownStepperAxis(name) => {
                write!(f, "Axis '{}' is not defined in the stepper configuration", name)
            }
            ConfigError::UnknownDriveAxis(name) => {
                write!(f, "Axis '{}' is not driven by the drive loop", name)
            }
            ConfigError::InvalidJoystickId(id) => {
                write!(f, "Invalid joystick id: {}. Must be 0-3", id)
            }
            ConfigError::InvalidPollFrequency(v) => {
                write!(f, "Invalid joystick poll frequency: {} Hz. Must be > 0", v)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::OutOfRange(v) => {
                write!(f, "Analog value must be between -1.0 and 1.0: {}", v)
            }
            CommandError::UnknownAxis(name) => write!(f, "Axis '{}' is not driven", name),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::UnknownAxis(name) => write!(f, "Unknown axis '{}'", name),
            DeviceError::OutOfRange { value, min, max } => {
                write!(f, "Value {} is not in range [{}, {}]", value, min, max)
            }
            DeviceError::Rejected { command, response } => {
                write!(f, "Command '{}' rejected: {}", command, response)
            }
            DeviceError::UnexpectedResponse(response) => {
                write!(f, "Unexpected response: {}", response)
            }
            DeviceError::Timeout => write!(f, "Controller timed out"),
            DeviceError::ConnectionClosed => write!(f, "Connection closed by controller"),
            DeviceError::Io(msg) => write!(f, "I/O error: {}", msg),
            DeviceError::AuthenticationFailed => {
                write!(f, "Authorization failed. Check password and connection")
            }
            DeviceError::PinError => write!(f, "GPIO pin operation failed"),
            DeviceError::AxisCapacityExceeded => write!(f, "No free axis channel"),
        }
    }
}

impl fmt::Display for GamepadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GamepadError::NotConnected(index) => write!(f, "Controller #{} not connected", index),
            GamepadError::Status(code) => write!(f, "Backend returned status 0x{:08X}", code),
            GamepadError::ShortBuffer(len) => {
                write!(f, "State buffer too short: {} bytes (need 16)", len)
            }
        }
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Error::Command(e)
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Error::Device(e)
    }
}

impl From<GamepadError> for Error {
    fn from(e: GamepadError) -> Self {
        Error::Gamepad(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

#[cfg(feature = "std")]
impl std::error::Error for DeviceError {}

#[cfg(feature = "std")]
impl std::error::Error for GamepadError {}

/// Copy `s` into a bounded string, truncating at a char boundary when full.
pub(crate) fn bounded<const N: usize>(s: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
