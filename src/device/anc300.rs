//! attocube ANC300 piezo stepper controller.
//!
//! Speaks the controller's ASCII console protocol: one command per line,
//! every answer terminated by the `>` prompt, errors flagged with `ERROR`.

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use heapless::FnvIndexMap;
use tracing::{debug, info, warn};

use crate::config::units::{Hertz, Steps, Volts};
use crate::config::{Anc300AxisConfig, Anc300Config, AxisId, InterfaceKind};
use crate::error::{bounded, ConfigError, DeviceError, Error, Result};

use super::StepperDevice;

/// Prompt terminating every answer.
const PROMPT: &str = ">";
/// Login prompt.
const AUTH_PROMPT: &str = "Authorization code: ";
/// Retries after the first password attempt.
const AUTH_RETRIES: u32 = 7;
/// Answer timeout.
const READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Per-axis configuration and last known controller values.
#[derive(Debug, Clone)]
struct AxisStatus {
    config: Anc300AxisConfig,
    frequency: Hertz,
    voltage: Volts,
    /// Farads, once measured.
    capacitance: Option<f64>,
}

/// ANC300 over any byte transport (TCP in production).
pub struct Anc300<T: Read + Write> {
    transport: T,
    /// Bytes read past the last prompt.
    pending: Vec<u8>,
    axes: FnvIndexMap<AxisId, AxisStatus, 8>,
}

impl Anc300<TcpStream> {
    /// Open the TCP session and log in.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for non-ethernet interfaces or a missing
    /// host, and a device error if the connection or login fails.
    pub fn connect(config: &Anc300Config) -> Result<Self> {
        if config.interface_type != InterfaceKind::Ethernet {
            return Err(Error::Config(ConfigError::UnsupportedInterface(bounded(
                config.interface_type.as_str(),
            ))));
        }
        let host = config
            .host
            .as_ref()
            .ok_or(Error::Config(ConfigError::MissingHost))?;

        let stream = TcpStream::connect((host.as_str(), config.port)).map_err(io_error)?;
        stream.set_read_timeout(Some(READ_TIMEOUT)).map_err(io_error)?;

        let mut device = Self::with_transport(stream, config);
        device.authenticate(config.password.as_str())?;
        info!(host = host.as_str(), port = config.port, "connection to ANC300 established");
        Ok(device)
    }
}

impl<T: Read + Write> Anc300<T> {
    /// Wrap an already open transport. No login is performed.
    pub fn with_transport(transport: T, config: &Anc300Config) -> Self {
        let mut axes = FnvIndexMap::new();
        for (name, axis) in config.axes.iter() {
            let _ = axes.insert(
                name.clone(),
                AxisStatus {
                    config: axis.clone(),
                    frequency: axis.frequency,
                    voltage: axis.voltage,
                    capacitance: None,
                },
            );
        }
        Self {
            transport,
            pending: Vec::new(),
            axes,
        }
    }

    /// Answer the login prompt with the password.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::AuthenticationFailed` once every attempt is used.
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        self.read_until(&[AUTH_PROMPT])?;
        for attempt in 0..=AUTH_RETRIES {
            self.write_line(password, "\n")?;
            let reply = self.read_until(&[PROMPT, AUTH_PROMPT])?;
            if reply.contains("success") {
                return Ok(());
            }
            warn!(attempt, "ANC300 refused authorization");
        }
        Err(Error::Device(DeviceError::AuthenticationFailed))
    }

    /// Measure capacitance, then apply configured frequency and voltage on
    /// every axis. The capacitance measurement leaves the axis in step mode.
    pub fn initialize_axes(&mut self) -> Result<()> {
        let names: heapless::Vec<AxisId, 8> = self.axes.keys().cloned().collect();
        for name in names.iter() {
            let (frequency, voltage) = {
                let status = self.status(name)?;
                (status.config.frequency, status.config.voltage)
            };
            self.measure_capacitance(name)?;
            self.set_frequency(name, frequency)?;
            self.set_voltage(name, voltage)?;
        }
        Ok(())
    }

    /// Read the step frequency from the controller.
    pub fn frequency(&mut self, axis: &str) -> Result<Hertz> {
        let id = self.status(axis)?.config.id;
        let command = format!("getf {}", id);
        let reply = self.send(&command)?;
        let value = parse_field(&reply, "frequency = ", " Hz")
            .ok_or_else(|| unexpected(&reply))?;
        let frequency = Hertz(value as f32);
        let status = self.status_mut(axis)?;
        if !status.config.frequency_range.contains(frequency.0) {
            warn!(axis, frequency = frequency.0, "current frequency is out of range");
        }
        status.frequency = frequency;
        Ok(frequency)
    }

    /// Read the drive voltage from the controller.
    pub fn voltage(&mut self, axis: &str) -> Result<Volts> {
        let id = self.status(axis)?.config.id;
        let command = format!("getv {}", id);
        let reply = self.send(&command)?;
        let value = parse_field(&reply, "voltage = ", " V").ok_or_else(|| unexpected(&reply))?;
        let voltage = Volts(value as f32);
        let status = self.status_mut(axis)?;
        if !status.config.voltage_range.contains(voltage.0) {
            warn!(axis, voltage = voltage.0, "current voltage is out of range");
        }
        status.voltage = voltage;
        Ok(voltage)
    }

    /// Measure the piezo capacitance in farads.
    ///
    /// Switches the axis to capacitance mode, waits for the measurement and
    /// returns it to step mode.
    pub fn measure_capacitance(&mut self, axis: &str) -> Result<f64> {
        let id = self.status(axis)?.config.id;
        self.send_ok(&format!("setm {} cap", id))?;
        self.send_ok(&format!("capw {}", id))?;
        let reply = self.send(&format!("getc {}", id))?;
        self.send_ok(&format!("setm {} stp", id))?;

        let farads = parse_capacitance(&reply).ok_or_else(|| unexpected(&reply))?;
        debug!(axis, farads, "capacitance measured");
        self.status_mut(axis)?.capacitance = Some(farads);
        Ok(farads)
    }

    /// Last measured capacitance in farads.
    pub fn capacitance(&self, axis: &str) -> Option<f64> {
        self.status(axis).ok().and_then(|s| s.capacitance)
    }

    /// Last frequency written or read.
    pub fn cached_frequency(&self, axis: &str) -> Option<Hertz> {
        self.status(axis).ok().map(|s| s.frequency)
    }

    /// Last voltage written or read.
    pub fn cached_voltage(&self, axis: &str) -> Option<Volts> {
        self.status(axis).ok().map(|s| s.voltage)
    }

    /// Ground every axis (unless `keep_active`) and release the transport.
    pub fn disconnect(mut self, keep_active: bool) -> Result<T> {
        if !keep_active {
            let ids: heapless::Vec<u8, 8> = self.axes.values().map(|s| s.config.id).collect();
            for id in ids {
                self.send_ok(&format!("setm {} gnd", id))?;
            }
        }
        info!("ANC300 disconnected");
        Ok(self.transport)
    }

    /// Send a command and return the answer up to the prompt.
    fn send(&mut self, command: &str) -> Result<String> {
        debug!(command, "ANC300 command");
        self.write_line(command, "\r\n")?;
        let reply = self.read_until(&[PROMPT])?;
        if reply.contains("ERROR") {
            return Err(Error::Device(DeviceError::Rejected {
                command: bounded(command),
                response: bounded(reply.trim()),
            }));
        }
        Ok(reply)
    }

    /// Send a command that must be acknowledged with `OK`.
    fn send_ok(&mut self, command: &str) -> Result<()> {
        let reply = self.send(command)?;
        if reply.contains("OK") {
            Ok(())
        } else {
            Err(unexpected(&reply))
        }
    }

    fn write_line(&mut self, line: &str, terminator: &str) -> Result<()> {
        self.transport.write_all(line.as_bytes()).map_err(io_error)?;
        self.transport.write_all(terminator.as_bytes()).map_err(io_error)?;
        self.transport.flush().map_err(io_error)
    }

    /// Read until one of `markers` appears; consumes through the marker.
    fn read_until(&mut self, markers: &[&str]) -> Result<String> {
        let mut chunk = [0u8; 256];
        loop {
            if let Some(end) = find_marker(&self.pending, markers) {
                let rest = self.pending.split_off(end);
                let reply = std::mem::replace(&mut self.pending, rest);
                return Ok(String::from_utf8_lossy(&reply).into_owned());
            }

            match self.transport.read(&mut chunk) {
                Ok(0) => return Err(Error::Device(DeviceError::ConnectionClosed)),
                Ok(n) => self.pending.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    return Err(Error::Device(DeviceError::Timeout));
                }
                Err(e) => return Err(io_error(e)),
            }
        }
    }

    fn status(&self, axis: &str) -> Result<&AxisStatus> {
        self.axes
            .iter()
            .find(|(k, _)| k.as_str() == axis)
            .map(|(_, v)| v)
            .ok_or_else(|| Error::Device(DeviceError::UnknownAxis(bounded(axis))))
    }

    fn status_mut(&mut self, axis: &str) -> Result<&mut AxisStatus> {
        self.axes
            .iter_mut()
            .find(|(k, _)| k.as_str() == axis)
            .map(|(_, v)| v)
            .ok_or_else(|| Error::Device(DeviceError::UnknownAxis(bounded(axis))))
    }
}

impl<T: Read + Write> StepperDevice for Anc300<T> {
    fn set_frequency(&mut self, axis: &str, frequency: Hertz) -> Result<()> {
        let (id, range) = {
            let status = self.status(axis)?;
            (status.config.id, status.config.frequency_range)
        };
        // The controller takes whole hertz
        let whole = frequency.0 as i64;
        if !range.contains(whole as f32) {
            return Err(Error::Device(DeviceError::OutOfRange {
                value: frequency.0,
                min: range.min(),
                max: range.max(),
            }));
        }
        self.send_ok(&format!("setf {} {}", id, whole))?;
        self.status_mut(axis)?.frequency = Hertz(whole as f32);
        Ok(())
    }

    fn set_voltage(&mut self, axis: &str, voltage: Volts) -> Result<()> {
        let (id, range) = {
            let status = self.status(axis)?;
            (status.config.id, status.config.voltage_range)
        };
        if !range.contains(voltage.0) {
            return Err(Error::Device(DeviceError::OutOfRange {
                value: voltage.0,
                min: range.min(),
                max: range.max(),
            }));
        }
        self.send_ok(&format!("setv {} {}", id, voltage.0))?;
        self.status_mut(axis)?.voltage = voltage;
        Ok(())
    }

    fn move_steps(&mut self, axis: &str, steps: Steps) -> Result<()> {
        let id = self.status(axis)?.config.id;
        match steps.0 {
            0 => Ok(()),
            n if n > 0 => self.send_ok(&format!("stpu {} {}", id, n)),
            n => self.send_ok(&format!("stpd {} {}", id, n.unsigned_abs())),
        }
    }

    fn stop_all(&mut self) -> Result<()> {
        let ids: heapless::Vec<u8, 8> = self.axes.values().map(|s| s.config.id).collect();
        for id in ids {
            self.send_ok(&format!("stop {}", id))?;
        }
        Ok(())
    }
}

/// Index just past the earliest marker in `buf`.
fn find_marker(buf: &[u8], markers: &[&str]) -> Option<usize> {
    markers
        .iter()
        .filter_map(|m| {
            let m = m.as_bytes();
            buf.windows(m.len())
                .position(|w| w == m)
                .map(|start| start + m.len())
        })
        .min()
}

/// Extract the number between `prefix` and `suffix`, e.g. `frequency = 1000 Hz`.
fn parse_field(reply: &str, prefix: &str, suffix: &str) -> Option<f64> {
    let start = reply.find(prefix)? + prefix.len();
    let rest = &reply[start..];
    let end = rest.find(suffix)?;
    rest[..end].trim().parse().ok()
}

/// Parse `capacitance = 1010 nF` into farads.
fn parse_capacitance(reply: &str) -> Option<f64> {
    let start = reply.find("capacitance = ")? + "capacitance = ".len();
    let mut parts = reply[start..].split_whitespace();
    let value: f64 = parts.next()?.parse().ok()?;
    let factor = match parts.next()? {
        "mF" => 1e-3,
        "µF" | "uF" => 1e-6,
        "nF" => 1e-9,
        _ => return None,
    };
    Some(value * factor)
}

fn unexpected(reply: &str) -> Error {
    Error::Device(DeviceError::UnexpectedResponse(bounded(reply.trim())))
}

fn io_error(e: std::io::Error) -> Error {
    match e.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => Error::Device(DeviceError::Timeout),
        _ => Error::Device(DeviceError::Io(bounded(&e.to_string()))),
    }
}
