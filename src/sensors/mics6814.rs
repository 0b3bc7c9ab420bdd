//! MiCS-6814 three-channel gas sensor driver (analog).
//!
//! Each channel (oxidising / reducing / NH3) is a chemiresistor in a
//! divider against a fixed load resistor, sampled through ADC1.  The
//! driver converts raw counts to sensing resistance in ohms; the display
//! layer scales to kΩ.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads three ADC1 channels via the oneshot API.
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use crate::error::SensorError;
use crate::pins;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;

static SIM_OX_ADC: AtomicU16 = AtomicU16::new(2048);
static SIM_RED_ADC: AtomicU16 = AtomicU16::new(2048);
static SIM_NH3_ADC: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gas_adc(oxidising: u16, reducing: u16, nh3: u16) {
    SIM_OX_ADC.store(oxidising, Ordering::Relaxed);
    SIM_RED_ADC.store(reducing, Ordering::Relaxed);
    SIM_NH3_ADC.store(nh3, Ordering::Relaxed);
}

/// Raw channel resistances in ohms.
#[derive(Debug, Clone, Copy, Default)]
pub struct GasResistances {
    pub oxidising: f32,
    pub reducing: f32,
    pub nh3: f32,
}

pub struct Mics6814 {
    load_ohms: f32,
}

impl Mics6814 {
    pub fn new() -> Self {
        Self {
            load_ohms: pins::GAS_LOAD_OHMS,
        }
    }

    /// Read all three channels together — they share a heater cycle, so
    /// split reads would see inconsistent operating points.
    pub fn read_all(&mut self) -> Result<GasResistances, SensorError> {
        Ok(GasResistances {
            oxidising: self.channel_resistance(self.read_adc(Channel::Oxidising)?)?,
            reducing: self.channel_resistance(self.read_adc(Channel::Reducing)?)?,
            nh3: self.channel_resistance(self.read_adc(Channel::Nh3)?)?,
        })
    }

    /// Divider maths: counts → volts → sensing resistance.
    fn channel_resistance(&self, raw: u16) -> Result<f32, SensorError> {
        let volts = f32::from(raw) / ADC_MAX * V_REF;
        let headroom = V_REF - volts;
        if headroom <= 0.01 {
            // Rail-pinned reading: divider open or sensor disconnected.
            return Err(SensorError::OutOfRange);
        }
        Ok((volts * self.load_ohms / headroom).max(0.0))
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self, channel: Channel) -> Result<u16, SensorError> {
        let adc_channel = match channel {
            Channel::Oxidising => pins::GAS_OX_ADC_CHANNEL,
            Channel::Reducing => pins::GAS_RED_ADC_CHANNEL,
            Channel::Nh3 => pins::GAS_NH3_ADC_CHANNEL,
        };
        hw_init::adc1_read(adc_channel).map_err(|_| SensorError::AdcReadFailed)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self, channel: Channel) -> Result<u16, SensorError> {
        Ok(match channel {
            Channel::Oxidising => SIM_OX_ADC.load(Ordering::Relaxed),
            Channel::Reducing => SIM_RED_ADC.load(Ordering::Relaxed),
            Channel::Nh3 => SIM_NH3_ADC.load(Ordering::Relaxed),
        })
    }
}

impl Default for Mics6814 {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum Channel {
    Oxidising,
    Reducing,
    Nh3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn midscale_counts_give_load_resistance() {
        let gas = Mics6814::new();
        // At half rail the divider is balanced: Rs == Rl.
        let rs = gas.channel_resistance(2048).unwrap();
        assert!((rs - pins::GAS_LOAD_OHMS).abs() / pins::GAS_LOAD_OHMS < 0.01);
    }

    #[test]
    fn rail_pinned_reading_is_rejected() {
        let gas = Mics6814::new();
        assert_eq!(gas.channel_resistance(4095), Err(SensorError::OutOfRange));
    }

    #[test]
    fn zero_counts_give_zero_resistance() {
        let gas = Mics6814::new();
        assert_eq!(gas.channel_resistance(0).unwrap(), 0.0);
    }
}
