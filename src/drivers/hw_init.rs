//! One-shot hardware peripheral initialization.
//!
//! Configures the I2C master (sensors), SPI master (LCD), ADC channels
//! (gas sensor), and GPIO directions using raw ESP-IDF sys calls.  Called
//! once from `main()` before the control loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    I2cInitFailed(i32),
    SpiInitFailed(i32),
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I2cInitFailed(rc) => write!(f, "I2C master init failed (rc={rc})"),
            Self::SpiInitFailed(rc) => write!(f, "SPI master init failed (rc={rc})"),
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_i2c()?;
        init_spi()?;
        init_adc()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── I2C master (LTR-559 + BME280) ─────────────────────────────

#[cfg(target_os = "espidf")]
const I2C_PORT: i32 = 0;
#[cfg(target_os = "espidf")]
const I2C_TIMEOUT_TICKS: u32 = 100;

#[cfg(target_os = "espidf")]
unsafe fn init_i2c() -> Result<(), HwInitError> {
    let cfg = i2c_config_t {
        mode: i2c_mode_t_I2C_MODE_MASTER,
        sda_io_num: pins::I2C_SDA_GPIO,
        scl_io_num: pins::I2C_SCL_GPIO,
        sda_pullup_en: true,
        scl_pullup_en: true,
        __bindgen_anon_1: i2c_config_t__bindgen_ty_1 {
            master: i2c_config_t__bindgen_ty_1__bindgen_ty_1 {
                clk_speed: pins::I2C_FREQ_HZ,
            },
        },
        ..Default::default()
    };
    let ret = unsafe { i2c_param_config(I2C_PORT, &cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    let ret = unsafe { i2c_driver_install(I2C_PORT, i2c_mode_t_I2C_MODE_MASTER, 0, 0, 0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::I2cInitFailed(ret));
    }
    info!("hw_init: I2C master on SDA={} SCL={}", pins::I2C_SDA_GPIO, pins::I2C_SCL_GPIO);
    Ok(())
}

/// Write `data` to a device register.
#[cfg(target_os = "espidf")]
pub fn i2c_write_reg(addr: u8, register: u8, data: &[u8]) -> Result<(), i32> {
    let mut frame = heapless::Vec::<u8, 16>::new();
    frame.push(register).map_err(|_| ESP_ERR_INVALID_ARG as i32)?;
    frame.extend_from_slice(data).map_err(|_| ESP_ERR_INVALID_ARG as i32)?;
    // SAFETY: driver installed in init_i2c(); buffer outlives the call.
    let ret = unsafe {
        i2c_master_write_to_device(
            I2C_PORT,
            addr,
            frame.as_ptr(),
            frame.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

/// Read `buf.len()` bytes starting at a device register.
#[cfg(target_os = "espidf")]
pub fn i2c_read_regs(addr: u8, register: u8, buf: &mut [u8]) -> Result<(), i32> {
    // SAFETY: driver installed in init_i2c(); buffers outlive the call.
    let ret = unsafe {
        i2c_master_write_read_device(
            I2C_PORT,
            addr,
            &register,
            1,
            buf.as_mut_ptr(),
            buf.len(),
            I2C_TIMEOUT_TICKS,
        )
    };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

// ── SPI master (ST7735 panel) ─────────────────────────────────

#[cfg(target_os = "espidf")]
static mut LCD_SPI_HANDLE: spi_device_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_spi() -> Result<(), HwInitError> {
    let bus_cfg = spi_bus_config_t {
        __bindgen_anon_1: spi_bus_config_t__bindgen_ty_1 {
            mosi_io_num: pins::LCD_MOSI_GPIO,
        },
        __bindgen_anon_2: spi_bus_config_t__bindgen_ty_2 { miso_io_num: -1 },
        sclk_io_num: pins::LCD_SCLK_GPIO,
        __bindgen_anon_3: spi_bus_config_t__bindgen_ty_3 { quadwp_io_num: -1 },
        __bindgen_anon_4: spi_bus_config_t__bindgen_ty_4 { quadhd_io_num: -1 },
        max_transfer_sz: (pins::LCD_WIDTH_PX * pins::LCD_HEIGHT_PX * 2) as i32,
        ..Default::default()
    };
    let ret = unsafe {
        spi_bus_initialize(
            spi_host_device_t_SPI2_HOST,
            &bus_cfg,
            spi_common_dma_t_SPI_DMA_CH_AUTO,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::SpiInitFailed(ret));
    }

    let dev_cfg = spi_device_interface_config_t {
        clock_speed_hz: pins::LCD_SPI_FREQ_HZ as i32,
        mode: 0,
        spics_io_num: pins::LCD_CS_GPIO,
        queue_size: 1,
        ..Default::default()
    };
    // SAFETY: LCD_SPI_HANDLE is only written here, once at boot.
    let ret = unsafe {
        spi_bus_add_device(spi_host_device_t_SPI2_HOST, &dev_cfg, &raw mut LCD_SPI_HANDLE)
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::SpiInitFailed(ret));
    }
    info!("hw_init: SPI2 panel device at {} Hz", pins::LCD_SPI_FREQ_HZ);
    Ok(())
}

/// Blocking SPI transfer of raw bytes to the panel.
#[cfg(target_os = "espidf")]
pub fn spi_write(data: &[u8]) -> Result<(), i32> {
    if data.is_empty() {
        return Ok(());
    }
    let mut txn: spi_transaction_t = unsafe { core::mem::zeroed() };
    txn.length = data.len() * 8;
    txn.__bindgen_anon_1.tx_buffer = data.as_ptr().cast();
    // SAFETY: handle written once in init_spi(); transaction is blocking so
    // the buffer outlives the transfer.
    let ret = unsafe { spi_device_transmit(LCD_SPI_HANDLE, &mut txn) };
    if ret == ESP_OK as i32 { Ok(()) } else { Err(ret) }
}

// ── ADC (oneshot, gas channels) ───────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_12,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    for channel in [
        pins::GAS_OX_ADC_CHANNEL,
        pins::GAS_RED_ADC_CHANNEL,
        pins::GAS_NH3_ADC_CHANNEL,
    ] {
        let ret =
            unsafe { adc_oneshot_config_channel(ADC1_HANDLE, channel as adc_channel_t, &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }
    info!("hw_init: ADC1 gas channels configured");
    Ok(())
}

/// Single oneshot conversion on an ADC1 channel.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: ADC1_HANDLE is written once during init_adc() before this
    // is reachable from the control loop.
    let ret = unsafe { adc_oneshot_read(ADC1_HANDLE, channel as adc_channel_t, &mut raw) };
    if ret == ESP_OK as i32 { Ok(raw as u16) } else { Err(ret) }
}

// ── GPIO outputs (panel control lines) ────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    for gpio in [
        pins::LCD_DC_GPIO,
        pins::LCD_RST_GPIO,
        pins::LCD_BACKLIGHT_GPIO,
    ] {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << gpio,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }
    Ok(())
}

/// Drive a configured output pin.
#[cfg(target_os = "espidf")]
pub fn gpio_set(gpio: i32, level: bool) {
    // SAFETY: pin configured as output in init_gpio_outputs().
    unsafe {
        gpio_set_level(gpio, u32::from(level));
    }
}
