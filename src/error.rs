//! Unified error types for the enviropod firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling uniform.
//! All variants are `Copy` so they can be cheaply threaded through the tick
//! pipeline without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// A display operation failed.
    Render(RenderError),
    /// The privileged power-off action failed.
    Shutdown(ShutdownError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Render(e) => write!(f, "render: {e}"),
            Self::Shutdown(e) => write!(f, "shutdown: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// I2C transaction to the sensor failed or timed out.
    BusReadFailed,
    /// I2C register write failed.
    BusWriteFailed,
    /// ADC read returned an error or timed out.
    AdcReadFailed,
    /// Reading is outside the physically plausible range.
    OutOfRange,
    /// Chip ID probe did not match the expected part.
    NotPresent,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BusReadFailed => write!(f, "bus read failed"),
            Self::BusWriteFailed => write!(f, "bus write failed"),
            Self::AdcReadFailed => write!(f, "ADC read failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
            Self::NotPresent => write!(f, "device not present"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Render errors
// ---------------------------------------------------------------------------

/// A broken display makes the device non-functional, so these are fatal
/// to the control loop rather than skipped like sensor failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// SPI transfer of the frame data failed.
    SpiWriteFailed,
    /// Panel initialisation command sequence failed.
    InitFailed,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpiWriteFailed => write!(f, "SPI write failed"),
            Self::InitFailed => write!(f, "panel init failed"),
        }
    }
}

impl From<RenderError> for Error {
    fn from(e: RenderError) -> Self {
        Self::Render(e)
    }
}

// ---------------------------------------------------------------------------
// Shutdown errors
// ---------------------------------------------------------------------------

/// Failure of the fire-and-forget power-off call. Logged, never retried:
/// the confirmation gesture already reached terminal intent, so the loop
/// exits regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownError {
    /// The platform power-off facility is unavailable.
    Unavailable,
}

impl fmt::Display for ShutdownError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "power-off unavailable"),
        }
    }
}

impl From<ShutdownError> for Error {
    fn from(e: ShutdownError) -> Self {
        Self::Shutdown(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
