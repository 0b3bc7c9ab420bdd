//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).  A future uplink adapter
//! would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                info!("{}: {:.1} {}", t.variable.label(), t.value, t.unit);
            }
            AppEvent::ModeChanged { from, to } => {
                info!("MODE | {:?} -> {:?}", from, to);
            }
            AppEvent::BacklightChanged { on } => {
                info!("BACKLIGHT | {}", if *on { "on" } else { "off" });
            }
            AppEvent::ShutdownStageChanged { from, to } => {
                info!("SHUTDOWN | {:?} -> {:?}", from, to);
            }
            AppEvent::ShutdownConfirmed => {
                info!("SHUTDOWN | confirmed, powering off");
            }
            AppEvent::SensorReadFailed { variable, error } => {
                warn!("SENSOR | {} read failed: {}", variable.label(), error);
            }
            AppEvent::Started(mode) => {
                info!("START | initial_mode={:?}", mode);
            }
        }
    }
}
