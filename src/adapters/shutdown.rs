//! Platform power-off adapter.
//!
//! Implements [`ShutdownPort`] over the deepest power state the platform
//! offers.  On the ESP32-S3 that is deep sleep with no wake source armed —
//! functionally "off" until the user cuts and restores power.
//!
//! On host/test targets the adapter only records that it fired.

use log::info;

use crate::app::ports::ShutdownPort;
use crate::error::ShutdownError;

pub struct SystemShutdown {
    #[cfg(not(target_os = "espidf"))]
    fired: bool,
}

impl SystemShutdown {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            fired: false,
        }
    }

    /// Whether the power-off was invoked (host simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn fired(&self) -> bool {
        self.fired
    }
}

impl Default for SystemShutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownPort for SystemShutdown {
    #[cfg(target_os = "espidf")]
    fn power_off(&mut self) -> Result<(), ShutdownError> {
        info!("entering deep sleep (power off)");
        // SAFETY: fire-and-forget platform call; does not return.
        unsafe {
            esp_idf_svc::sys::esp_deep_sleep_start();
        }
        #[allow(unreachable_code)]
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn power_off(&mut self) -> Result<(), ShutdownError> {
        info!("power off (simulated)");
        self.fired = true;
        Ok(())
    }
}
