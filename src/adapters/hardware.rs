//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the panel driver, exposing them through
//! [`SensorPort`] and [`DisplayPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{DisplayPort, GasReading, SensorPort};
use crate::drivers::st7735::St7735;
use crate::error::{RenderError, SensorError};
use crate::render::FrameBuffer;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    panel: St7735,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, panel: St7735) -> Self {
        Self { sensor_hub, panel }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_proximity(&mut self) -> Result<u16, SensorError> {
        self.sensor_hub.read_proximity()
    }

    fn read_lux(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_lux()
    }

    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_temperature()
    }

    fn read_pressure(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_pressure()
    }

    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.sensor_hub.read_humidity()
    }

    fn read_gas(&mut self) -> Result<GasReading, SensorError> {
        let r = self.sensor_hub.read_gas()?;
        Ok(GasReading {
            oxidising: r.oxidising,
            reducing: r.reducing,
            nh3: r.nh3,
        })
    }
}

// ── DisplayPort implementation ────────────────────────────────

impl DisplayPort for HardwareAdapter {
    fn set_backlight(&mut self, on: bool) {
        self.panel.set_backlight(on);
    }

    fn push_frame(&mut self, frame: &FrameBuffer) -> Result<(), RenderError> {
        self.panel.push_frame(frame)
    }
}
