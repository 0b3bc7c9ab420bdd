//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, the display, the power-off hook, event sinks)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.  All port errors are typed — callers must handle every variant
//! explicitly.

use crate::error::{RenderError, SensorError, ShutdownError};
use crate::render::FrameBuffer;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw resistances (ohms) of the three gas channels, read together.
#[derive(Debug, Clone, Copy, Default)]
pub struct GasReading {
    pub oxidising: f32,
    pub reducing: f32,
    pub nh3: f32,
}

/// Read-side port: the domain calls this to obtain sensor data.
///
/// Only the active telemetry mode's channel is read each tick, so the
/// methods are per-channel rather than one aggregate snapshot.
pub trait SensorPort {
    /// Proximity intensity in sensor counts (larger = closer).
    fn read_proximity(&mut self) -> Result<u16, SensorError>;

    /// Ambient light level in lux.
    fn read_lux(&mut self) -> Result<f32, SensorError>;

    /// Ambient temperature in °C (uncompensated).
    fn read_temperature(&mut self) -> Result<f32, SensorError>;

    /// Barometric pressure in hPa.
    fn read_pressure(&mut self) -> Result<f32, SensorError>;

    /// Relative humidity in percent.
    fn read_humidity(&mut self) -> Result<f32, SensorError>;

    /// All three gas channel resistances, in ohms.
    fn read_gas(&mut self) -> Result<GasReading, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (driven adapter: domain → panel)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to drive the panel.
pub trait DisplayPort {
    /// Switch the backlight supply.
    fn set_backlight(&mut self, on: bool);

    /// Push a complete frame to the panel.  Failure is fatal to the tick:
    /// a broken display makes the device non-functional.
    fn push_frame(&mut self, frame: &FrameBuffer) -> Result<(), RenderError>;
}

// ───────────────────────────────────────────────────────────────
// Shutdown port (driven adapter: domain → platform power-off)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget privileged power-off.  Injected as a capability so the
/// confirmation path stays testable without powering anything down.
pub trait ShutdownPort {
    fn power_off(&mut self) -> Result<(), ShutdownError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, a
/// future radio uplink, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
