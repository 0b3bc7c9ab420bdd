//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver and exposes the per-channel reads the
//! interaction engine needs.  Only the visible telemetry channel is read
//! each tick, so there is no unified snapshot — just cheap single reads.

pub mod bme280;
pub mod ltr559;
pub mod mics6814;

use crate::error::SensorError;

use bme280::Bme280;
use ltr559::Ltr559;
use mics6814::{GasResistances, Mics6814};

/// Aggregates all sensor drivers behind one struct the hardware adapter
/// can own.
pub struct SensorHub {
    pub light: Ltr559,
    pub environment: Bme280,
    pub gas: Mics6814,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(light: Ltr559, environment: Bme280, gas: Mics6814) -> Self {
        Self {
            light,
            environment,
            gas,
        }
    }

    /// Probe and configure every sensor.  Fails fast: a pod with a dead
    /// sensor bus is misassembled hardware, not a runtime condition.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.light.init()?;
        self.environment.init()?;
        Ok(())
    }

    pub fn read_proximity(&mut self) -> Result<u16, SensorError> {
        self.light.read_proximity()
    }

    pub fn read_lux(&mut self) -> Result<f32, SensorError> {
        self.light.read_lux()
    }

    pub fn read_temperature(&mut self) -> Result<f32, SensorError> {
        self.environment.read_temperature()
    }

    pub fn read_pressure(&mut self) -> Result<f32, SensorError> {
        self.environment.read_pressure()
    }

    pub fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.environment.read_humidity()
    }

    pub fn read_gas(&mut self) -> Result<GasResistances, SensorError> {
        self.gas.read_all()
    }
}
