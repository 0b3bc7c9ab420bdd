//! BME280 temperature / pressure / humidity sensor driver (I2C).
//!
//! Burst-reads the measurement block and applies the Bosch compensation
//! formulas (double-precision variant from the datasheet) against the
//! factory calibration words read once at init.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: register access over the shared I2C master via hw_init.
//! On host/test: reads from static atomics for injection.

use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::SensorError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

pub const I2C_ADDR: u8 = 0x76;

#[allow(dead_code)]
mod reg {
    pub const ID: u8 = 0xD0;
    pub const RESET: u8 = 0xE0;
    pub const CTRL_HUM: u8 = 0xF2;
    pub const CTRL_MEAS: u8 = 0xF4;
    pub const CONFIG: u8 = 0xF5;
    pub const CALIB_BLOCK_1: u8 = 0x88;
    pub const CALIB_H1: u8 = 0xA1;
    pub const CALIB_BLOCK_2: u8 = 0xE1;
    pub const DATA: u8 = 0xF7;
}

/// ID register value for the BME280.
#[cfg(target_os = "espidf")]
const CHIP_ID_BME280: u8 = 0x60;

/// Humidity oversampling x1.
#[cfg(target_os = "espidf")]
const CTRL_HUM_OS1: u8 = 0x01;
/// Temperature x1, pressure x1, normal mode.
#[cfg(target_os = "espidf")]
const CTRL_MEAS_NORMAL: u8 = 0x27;
/// 250 ms standby, IIR filter off.
#[cfg(target_os = "espidf")]
const CONFIG_STANDBY_250MS: u8 = 0x60;

static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0);
static SIM_PRESS_BITS: AtomicU32 = AtomicU32::new(0);
static SIM_HUM_BITS: AtomicU32 = AtomicU32::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_environment(temperature_c: f32, pressure_hpa: f32, humidity_pct: f32) {
    SIM_TEMP_BITS.store(temperature_c.to_bits(), Ordering::Relaxed);
    SIM_PRESS_BITS.store(pressure_hpa.to_bits(), Ordering::Relaxed);
    SIM_HUM_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
}

/// Factory calibration words (datasheet table 16).
#[cfg(target_os = "espidf")]
#[derive(Debug, Clone, Copy, Default)]
struct Calibration {
    t1: u16,
    t2: i16,
    t3: i16,
    p1: u16,
    p2: i16,
    p3: i16,
    p4: i16,
    p5: i16,
    p6: i16,
    p7: i16,
    p8: i16,
    p9: i16,
    h1: u8,
    h2: i16,
    h3: u8,
    h4: i16,
    h5: i16,
    h6: i8,
}

pub struct Bme280 {
    #[cfg(target_os = "espidf")]
    cal: Calibration,
}

impl Bme280 {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            cal: Calibration::default(),
        }
    }

    /// Probe the chip ID, load calibration, and start continuous sampling.
    #[cfg(target_os = "espidf")]
    pub fn init(&mut self) -> Result<(), SensorError> {
        let mut id = [0u8; 1];
        hw_init::i2c_read_regs(I2C_ADDR, reg::ID, &mut id)
            .map_err(|_| SensorError::BusReadFailed)?;
        if id[0] != CHIP_ID_BME280 {
            return Err(SensorError::NotPresent);
        }

        self.cal = Self::read_calibration()?;

        // CTRL_HUM must be written before CTRL_MEAS to latch.
        hw_init::i2c_write_reg(I2C_ADDR, reg::CTRL_HUM, &[CTRL_HUM_OS1])
            .map_err(|_| SensorError::BusWriteFailed)?;
        hw_init::i2c_write_reg(I2C_ADDR, reg::CONFIG, &[CONFIG_STANDBY_250MS])
            .map_err(|_| SensorError::BusWriteFailed)?;
        hw_init::i2c_write_reg(I2C_ADDR, reg::CTRL_MEAS, &[CTRL_MEAS_NORMAL])
            .map_err(|_| SensorError::BusWriteFailed)?;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init(&mut self) -> Result<(), SensorError> {
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn read_calibration() -> Result<Calibration, SensorError> {
        let mut b1 = [0u8; 24];
        hw_init::i2c_read_regs(I2C_ADDR, reg::CALIB_BLOCK_1, &mut b1)
            .map_err(|_| SensorError::BusReadFailed)?;
        let mut h1 = [0u8; 1];
        hw_init::i2c_read_regs(I2C_ADDR, reg::CALIB_H1, &mut h1)
            .map_err(|_| SensorError::BusReadFailed)?;
        let mut b2 = [0u8; 7];
        hw_init::i2c_read_regs(I2C_ADDR, reg::CALIB_BLOCK_2, &mut b2)
            .map_err(|_| SensorError::BusReadFailed)?;

        let u16le = |lo: u8, hi: u8| u16::from_le_bytes([lo, hi]);
        let i16le = |lo: u8, hi: u8| i16::from_le_bytes([lo, hi]);

        Ok(Calibration {
            t1: u16le(b1[0], b1[1]),
            t2: i16le(b1[2], b1[3]),
            t3: i16le(b1[4], b1[5]),
            p1: u16le(b1[6], b1[7]),
            p2: i16le(b1[8], b1[9]),
            p3: i16le(b1[10], b1[11]),
            p4: i16le(b1[12], b1[13]),
            p5: i16le(b1[14], b1[15]),
            p6: i16le(b1[16], b1[17]),
            p7: i16le(b1[18], b1[19]),
            p8: i16le(b1[20], b1[21]),
            p9: i16le(b1[22], b1[23]),
            h1: h1[0],
            h2: i16le(b2[0], b2[1]),
            h3: b2[2],
            // H4/H5 share a nibble-packed byte (0xE5).
            h4: (i16::from(b2[3] as i8) << 4) | i16::from(b2[4] & 0x0F),
            h5: (i16::from(b2[5] as i8) << 4) | i16::from(b2[4] >> 4),
            h6: b2[6] as i8,
        })
    }

    /// One burst read of the measurement block, fully compensated.
    #[cfg(target_os = "espidf")]
    fn read_compensated(&self) -> Result<(f32, f32, f32), SensorError> {
        let mut d = [0u8; 8];
        hw_init::i2c_read_regs(I2C_ADDR, reg::DATA, &mut d)
            .map_err(|_| SensorError::BusReadFailed)?;

        let adc_p = (u32::from(d[0]) << 12) | (u32::from(d[1]) << 4) | (u32::from(d[2]) >> 4);
        let adc_t = (u32::from(d[3]) << 12) | (u32::from(d[4]) << 4) | (u32::from(d[5]) >> 4);
        let adc_h = (u32::from(d[6]) << 8) | u32::from(d[7]);

        let c = &self.cal;

        // Temperature (datasheet 4.2.3, double variant).
        let adc_t = f64::from(adc_t);
        let var1 = (adc_t / 16384.0 - f64::from(c.t1) / 1024.0) * f64::from(c.t2);
        let var2 = (adc_t / 131072.0 - f64::from(c.t1) / 8192.0).powi(2) * f64::from(c.t3);
        let t_fine = var1 + var2;
        let temperature = t_fine / 5120.0;

        // Pressure.
        let adc_p = f64::from(adc_p);
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * f64::from(c.p6) / 32768.0;
        var2 += var1 * f64::from(c.p5) * 2.0;
        var2 = var2 / 4.0 + f64::from(c.p4) * 65536.0;
        var1 = (f64::from(c.p3) * var1 * var1 / 524288.0 + f64::from(c.p2) * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * f64::from(c.p1);
        let pressure = if var1 == 0.0 {
            0.0
        } else {
            let mut p = 1048576.0 - adc_p;
            p = (p - var2 / 4096.0) * 6250.0 / var1;
            let var1 = f64::from(c.p9) * p * p / 2147483648.0;
            let var2 = p * f64::from(c.p8) / 32768.0;
            p + (var1 + var2 + f64::from(c.p7)) / 16.0
        };

        // Humidity.
        let adc_h = f64::from(adc_h);
        let h = t_fine - 76800.0;
        let h = (adc_h - (f64::from(c.h4) * 64.0 + f64::from(c.h5) / 16384.0 * h))
            * (f64::from(c.h2) / 65536.0
                * (1.0
                    + f64::from(c.h6) / 67108864.0
                        * h
                        * (1.0 + f64::from(c.h3) / 67108864.0 * h)));
        let humidity = (h * (1.0 - f64::from(c.h1) * h / 524288.0)).clamp(0.0, 100.0);

        Ok((temperature as f32, (pressure / 100.0) as f32, humidity as f32))
    }

    /// Ambient temperature in °C (uncompensated for self-heating; the
    /// interaction engine applies the fixed display offset).
    #[cfg(target_os = "espidf")]
    pub fn read_temperature(&mut self) -> Result<f32, SensorError> {
        let (t, _, _) = self.read_compensated()?;
        if !(-40.0..=85.0).contains(&t) {
            return Err(SensorError::OutOfRange);
        }
        Ok(t)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_temperature(&mut self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)))
    }

    /// Barometric pressure in hPa.
    #[cfg(target_os = "espidf")]
    pub fn read_pressure(&mut self) -> Result<f32, SensorError> {
        let (_, p, _) = self.read_compensated()?;
        if !(300.0..=1100.0).contains(&p) {
            return Err(SensorError::OutOfRange);
        }
        Ok(p)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_pressure(&mut self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_PRESS_BITS.load(Ordering::Relaxed)))
    }

    /// Relative humidity in percent.
    #[cfg(target_os = "espidf")]
    pub fn read_humidity(&mut self) -> Result<f32, SensorError> {
        let (_, _, h) = self.read_compensated()?;
        Ok(h)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_humidity(&mut self) -> Result<f32, SensorError> {
        Ok(f32::from_bits(SIM_HUM_BITS.load(Ordering::Relaxed)))
    }
}

impl Default for Bme280 {
    fn default() -> Self {
        Self::new()
    }
}
