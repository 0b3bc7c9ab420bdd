//! LTR-559 proximity + ambient-light sensor driver (I2C).
//!
//! The proximity channel drives the touch-free gesture engine; the ALS
//! channels feed the Light telemetry mode.  Lux conversion follows the
//! Lite-On application-note segments over the two-channel ratio.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: register access over the shared I2C master via hw_init.
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::{AtomicU16, AtomicU32, Ordering};

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

pub const I2C_ADDR: u8 = 0x23;

#[allow(dead_code)]
mod reg {
    pub const ALS_CONTR: u8 = 0x80;
    pub const PS_CONTR: u8 = 0x81;
    pub const PS_LED: u8 = 0x82;
    pub const PS_N_PULSES: u8 = 0x83;
    pub const PS_MEAS_RATE: u8 = 0x84;
    pub const ALS_MEAS_RATE: u8 = 0x85;
    pub const PART_ID: u8 = 0x86;
    pub const ALS_DATA_CH1_0: u8 = 0x88;
    pub const PS_DATA_0: u8 = 0x8D;
}

/// PART_ID register value for the LTR-559.
#[cfg(target_os = "espidf")]
const PART_ID_LTR559: u8 = 0x92;

/// ALS gain 4x, active mode.
#[cfg(target_os = "espidf")]
const ALS_CONTR_ACTIVE: u8 = 0x09;
/// PS active mode.
#[cfg(target_os = "espidf")]
const PS_CONTR_ACTIVE: u8 = 0x03;
/// LED 30 kHz, 100% duty, 50 mA.
#[cfg(target_os = "espidf")]
const PS_LED_CONFIG: u8 = 0x7F;
#[cfg(target_os = "espidf")]
const PS_PULSES: u8 = 0x01;
/// PS measurement every 50 ms.
#[cfg(target_os = "espidf")]
const PS_RATE_50MS: u8 = 0x02;
/// ALS integration 50 ms, repeat 50 ms.
#[cfg(target_os = "espidf")]
const ALS_RATE_50MS: u8 = 0x01;

#[allow(dead_code)]
const ALS_GAIN: f32 = 4.0;
#[allow(dead_code)]
const ALS_INTEGRATION: f32 = 0.5; // 50 ms expressed in units of 100 ms

static SIM_PROXIMITY: AtomicU16 = AtomicU16::new(0);
static SIM_LUX_BITS: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_proximity(counts: u16) {
    SIM_PROXIMITY.store(counts, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_lux(lux: f32) {
    SIM_LUX_BITS.store(lux.to_bits(), Ordering::Relaxed);
}

pub struct Ltr559;

impl Ltr559 {
    pub fn new() -> Self {
        Self
    }

    /// Probe the part ID and configure both channels for continuous
    /// measurement.
    #[cfg(target_os = "espidf")]
    pub fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        hw_init::i2c_read_regs(I2C_ADDR, reg::PART_ID, &mut id)
            .map_err(|_| SensorError::BusReadFailed)?;
        if id[0] != PART_ID_LTR559 {
            return Err(SensorError::NotPresent);
        }

        for (register, value) in [
            (reg::ALS_CONTR, ALS_CONTR_ACTIVE),
            (reg::PS_CONTR, PS_CONTR_ACTIVE),
            (reg::PS_LED, PS_LED_CONFIG),
            (reg::PS_N_PULSES, PS_PULSES),
            (reg::PS_MEAS_RATE, PS_RATE_50MS),
            (reg::ALS_MEAS_RATE, ALS_RATE_50MS),
        ] {
            hw_init::i2c_write_reg(I2C_ADDR, register, &[value])
                .map_err(|_| SensorError::BusWriteFailed)?;
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    /// Proximity intensity, 11-bit counts (larger = closer).
    #[cfg(target_os = "espidf")]
    pub fn read_proximity(&mut self) -> Result<u16, SensorError> {
        let mut raw = [0u8; 2];
        hw_init::i2c_read_regs(I2C_ADDR, reg::PS_DATA_0, &mut raw)
            .map_err(|_| SensorError::BusReadFailed)?;
        Ok(u16::from(raw[0]) | (u16::from(raw[1] & 0x07) << 8))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_proximity(&mut self) -> Result<u16, SensorError> {
        Ok(SIM_PROXIMITY.load(Ordering::Relaxed))
    }

    /// Ambient light in lux from the two ALS channels.
    #[cfg(target_os = "espidf")]
    pub fn read_lux(&mut self) -> Result<f32, SensorError> {
        let mut raw = [0u8; 4];
        hw_init::i2c_read_regs(I2C_ADDR, reg::ALS_DATA_CH1_0, &mut raw)
            .map_err(|_| SensorError::BusReadFailed)?;
        let ch1 = f32::from(u16::from_le_bytes([raw[0], raw[1]]));
        let ch0 = f32::from(u16::from_le_bytes([raw[2], raw[3]]));
        Ok(lux_from_channels(ch0, ch1))
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_lux(&mut self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_LUX_BITS.load(Ordering::Relaxed)))
    }
}

impl Default for Ltr559 {
    fn default() -> Self {
        Self::new()
    }
}

/// Segmented two-channel lux formula from the Lite-On application note,
/// scaled by the configured gain and integration time.
#[allow(dead_code)]
fn lux_from_channels(ch0: f32, ch1: f32) -> f32 {
    let total = ch0 + ch1;
    if total <= 0.0 {
        return 0.0;
    }
    let ratio = ch1 / total;
    let lux = if ratio < 0.45 {
        1.7743 * ch0 + 1.1059 * ch1
    } else if ratio < 0.64 {
        4.2785 * ch0 - 1.9548 * ch1
    } else if ratio < 0.85 {
        0.5926 * ch0 + 0.1185 * ch1
    } else {
        0.0
    };
    (lux / (ALS_GAIN * ALS_INTEGRATION)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_channels_read_zero_lux() {
        assert_eq!(lux_from_channels(0.0, 0.0), 0.0);
    }

    #[test]
    fn infrared_dominated_ratio_is_rejected() {
        // ratio ≥ 0.85 means the reading is IR glare, not visible light.
        assert_eq!(lux_from_channels(10.0, 90.0), 0.0);
    }

    #[test]
    fn visible_light_scales_with_ch0() {
        let dim = lux_from_channels(100.0, 10.0);
        let bright = lux_from_channels(1000.0, 100.0);
        assert!(bright > dim && dim > 0.0);
    }
}
