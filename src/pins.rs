//! GPIO / peripheral pin assignments for the enviropod main board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// I²C bus (LTR-559 proximity/light + BME280 environmental)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 8;
pub const I2C_SCL_GPIO: i32 = 9;
/// I²C bus clock (both sensors are happy at fast mode).
pub const I2C_FREQ_HZ: u32 = 400_000;

// ---------------------------------------------------------------------------
// ST7735S LCD panel (SPI2)
// ---------------------------------------------------------------------------

pub const LCD_SCLK_GPIO: i32 = 12;
pub const LCD_MOSI_GPIO: i32 = 11;
pub const LCD_CS_GPIO: i32 = 10;
/// Data/command select: LOW = command byte, HIGH = pixel/parameter data.
pub const LCD_DC_GPIO: i32 = 13;
/// Active-low hardware reset line.
pub const LCD_RST_GPIO: i32 = 14;
/// Backlight enable (active HIGH, switched by the idle policy).
pub const LCD_BACKLIGHT_GPIO: i32 = 15;
pub const LCD_SPI_FREQ_HZ: u32 = 10_000_000;

/// Panel geometry — 0.96" 160x80 ST7735S, mounted landscape.
pub const LCD_WIDTH_PX: usize = 160;
pub const LCD_HEIGHT_PX: usize = 80;
/// The 160x80 variant's RAM window is offset inside the 162x132 GRAM.
pub const LCD_X_OFFSET: u16 = 1;
pub const LCD_Y_OFFSET: u16 = 26;

// ---------------------------------------------------------------------------
// MiCS-6814 gas sensor — three analog channels (ADC1)
// ---------------------------------------------------------------------------

/// Oxidising channel (NO2) — ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const GAS_OX_ADC_CHANNEL: u32 = 3;
/// Reducing channel (CO) — ADC1 channel 4 (GPIO 5 on ESP32-S3).
pub const GAS_RED_ADC_CHANNEL: u32 = 4;
/// NH3 channel — ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const GAS_NH3_ADC_CHANNEL: u32 = 5;

/// Load resistor on each gas channel's divider (ohms).
pub const GAS_LOAD_OHMS: f32 = 56_000.0;
