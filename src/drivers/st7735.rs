//! ST7735S LCD panel driver (SPI).
//!
//! Hand-rolled driver for the 0.96" 160x80 variant: reset + init command
//! sequence, whole-frame RAMWR pushes, and the backlight enable line.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: commands and pixel data go out over SPI2 via hw_init, with
//! the DC line selecting command vs data bytes.
//! On host/test: tracks pushes and backlight state in-memory only.

use crate::error::RenderError;
use crate::render::FrameBuffer;

#[cfg(target_os = "espidf")]
use crate::{drivers::hw_init, pins, render::frame};

#[cfg(target_os = "espidf")]
use embedded_graphics::prelude::IntoStorage;

#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
    pub const FRMCTR1: u8 = 0xB1;
}

/// Row/column exchange + x-mirror for landscape mounting, BGR order.
#[cfg(target_os = "espidf")]
const MADCTL_LANDSCAPE_BGR: u8 = 0x68;
/// 16-bit RGB565 pixel format.
#[cfg(target_os = "espidf")]
const COLMOD_16BPP: u8 = 0x05;

pub struct St7735 {
    backlight_on: bool,
    #[cfg(not(target_os = "espidf"))]
    frames_pushed: u32,
}

impl St7735 {
    pub fn new() -> Self {
        Self {
            backlight_on: false,
            #[cfg(not(target_os = "espidf"))]
            frames_pushed: 0,
        }
    }

    /// Hardware reset and panel configuration.  The 160x80 module needs
    /// inversion on and a GRAM window offset inside the 162x132 array.
    #[cfg(target_os = "espidf")]
    pub fn init(&mut self) -> Result<(), RenderError> {
        hw_init::gpio_set(pins::LCD_RST_GPIO, false);
        std::thread::sleep(std::time::Duration::from_millis(50));
        hw_init::gpio_set(pins::LCD_RST_GPIO, true);
        std::thread::sleep(std::time::Duration::from_millis(120));

        self.command(cmd::SWRESET, &[])?;
        std::thread::sleep(std::time::Duration::from_millis(120));
        self.command(cmd::SLPOUT, &[])?;
        std::thread::sleep(std::time::Duration::from_millis(120));

        self.command(cmd::FRMCTR1, &[0x01, 0x2C, 0x2D])?;
        self.command(cmd::COLMOD, &[COLMOD_16BPP])?;
        self.command(cmd::MADCTL, &[MADCTL_LANDSCAPE_BGR])?;
        self.command(cmd::INVON, &[])?;
        self.command(cmd::NORON, &[])?;
        self.command(cmd::DISPON, &[])?;
        std::thread::sleep(std::time::Duration::from_millis(100));
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn init(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Switch the backlight supply line.
    pub fn set_backlight(&mut self, on: bool) {
        #[cfg(target_os = "espidf")]
        hw_init::gpio_set(pins::LCD_BACKLIGHT_GPIO, on);
        self.backlight_on = on;
    }

    pub fn backlight_on(&self) -> bool {
        self.backlight_on
    }

    /// Push a complete frame into the panel's GRAM window.
    #[cfg(target_os = "espidf")]
    pub fn push_frame(&mut self, frame_buf: &FrameBuffer) -> Result<(), RenderError> {
        let x0 = pins::LCD_X_OFFSET;
        let x1 = x0 + frame::WIDTH as u16 - 1;
        let y0 = pins::LCD_Y_OFFSET;
        let y1 = y0 + frame::HEIGHT as u16 - 1;
        self.command(cmd::CASET, &window_bounds(x0, x1))?;
        self.command(cmd::RASET, &window_bounds(y0, y1))?;

        let mut bytes = Vec::with_capacity(frame_buf.data().len() * 2);
        for pixel in frame_buf.data() {
            bytes.extend_from_slice(&pixel.into_storage().to_be_bytes());
        }
        self.command(cmd::RAMWR, &[])?;
        hw_init::gpio_set(pins::LCD_DC_GPIO, true);
        for chunk in bytes.chunks(4096) {
            hw_init::spi_write(chunk).map_err(|_| RenderError::SpiWriteFailed)?;
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn push_frame(&mut self, _frame_buf: &FrameBuffer) -> Result<(), RenderError> {
        self.frames_pushed += 1;
        Ok(())
    }

    /// Frames pushed since boot (host simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn frames_pushed(&self) -> u32 {
        self.frames_pushed
    }

    #[cfg(target_os = "espidf")]
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), RenderError> {
        hw_init::gpio_set(pins::LCD_DC_GPIO, false);
        hw_init::spi_write(&[command]).map_err(|_| RenderError::SpiWriteFailed)?;
        if !params.is_empty() {
            hw_init::gpio_set(pins::LCD_DC_GPIO, true);
            hw_init::spi_write(params).map_err(|_| RenderError::SpiWriteFailed)?;
        }
        Ok(())
    }
}

impl Default for St7735 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_os = "espidf")]
fn window_bounds(start: u16, end: u16) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}
