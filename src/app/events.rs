//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, feed a test
//! recorder, etc.

use crate::error::SensorError;
use crate::gesture::ShutdownStage;
use crate::modes::{DisplayMode, Variable};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(DisplayMode),

    /// A gesture onset advanced the mode cycle.
    ModeChanged { from: DisplayMode, to: DisplayMode },

    /// The backlight switched on (gesture wake) or off (idle timeout).
    BacklightChanged { on: bool },

    /// The shutdown gesture moved between stages.
    ShutdownStageChanged {
        from: ShutdownStage,
        to: ShutdownStage,
    },

    /// The hold gesture completed; the loop is about to terminate.
    ShutdownConfirmed,

    /// Per-tick telemetry reading for the visible channel.
    Telemetry(TelemetryData),

    /// A sensor read failed; the previous sample was reused.
    SensorReadFailed {
        variable: Variable,
        error: SensorError,
    },
}

/// A point-in-time reading suitable for logging.
#[derive(Debug, Clone, Copy)]
pub struct TelemetryData {
    pub variable: Variable,
    pub value: f32,
    pub unit: &'static str,
}
