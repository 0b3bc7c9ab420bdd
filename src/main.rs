//! Enviropod Firmware — Main Entry Point
//!
//! Hexagonal architecture with a fixed-period control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Adapters (outer ring)                    │
//! │                                                              │
//! │  HardwareAdapter       LogEventSink      SystemShutdown      │
//! │  (Sensor+Display)      (EventSink)       (ShutdownPort)      │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ────────────────        │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │             AppService (pure logic)                │      │
//! │  │  gesture · modes · backlight · telemetry · render  │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The loop is sleep-then-work at a fixed period: drift from tick
//! processing time accumulates uncorrected, which is acceptable for a
//! human-facing display.
#![deny(unused_must_use)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info};

use enviropod::adapters::hardware::HardwareAdapter;
use enviropod::adapters::log_sink::LogEventSink;
use enviropod::adapters::shutdown::SystemShutdown;
use enviropod::app::ports::ShutdownPort;
use enviropod::app::service::{AppService, TickOutcome};
use enviropod::config::SystemConfig;
use enviropod::drivers::{hw_init, st7735::St7735};
use enviropod::sensors::{SensorHub, bme280::Bme280, ltr559::Ltr559, mics6814::Mics6814};

/// Set by an external termination request (e.g. a supervisor task); the
/// loop drains the current tick and exits with success status.
static STOP_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Request a clean loop exit from another context.
#[allow(dead_code)]
pub fn request_stop() {
    STOP_REQUESTED.store(true, Ordering::Relaxed);
}

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!(
        "enviropod v{} — wave to cycle, hold to shut down",
        env!("CARGO_PKG_VERSION")
    );

    // ── 2. Peripheral bring-up ────────────────────────────────
    hw_init::init_peripherals()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("peripheral init failed")?;

    let mut sensor_hub = SensorHub::new(Ltr559::new(), Bme280::new(), Mics6814::new());
    sensor_hub
        .init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("sensor init failed")?;

    let mut panel = St7735::new();
    panel
        .init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("panel init failed")?;
    panel.set_backlight(true);

    // ── 3. Construct adapters + app service ───────────────────
    let mut hw = HardwareAdapter::new(sensor_hub, panel);
    let mut sink = LogEventSink::new();
    let mut shutdown = SystemShutdown::new();

    let config = SystemConfig::default();
    let tick = Duration::from_millis(u64::from(config.tick_interval_ms));
    let mut app = AppService::new(config);
    app.start(&mut sink);

    info!("System ready. Entering control loop.");

    // ── 4. Control loop ───────────────────────────────────────
    loop {
        std::thread::sleep(tick);

        if STOP_REQUESTED.load(Ordering::Relaxed) {
            info!("stop requested, exiting control loop");
            break;
        }

        match app.tick(&mut hw, &mut sink) {
            Ok(TickOutcome::Continue) => {}
            Ok(TickOutcome::Shutdown) => {
                if let Err(e) = shutdown.power_off() {
                    // Terminal intent was already reached; log and exit anyway.
                    error!("shutdown action failed: {e}");
                }
                break;
            }
            Err(e) => {
                error!("tick failed: {e}");
                return Err(anyhow::anyhow!("{e}")).context("control loop aborted");
            }
        }
    }

    Ok(())
}
