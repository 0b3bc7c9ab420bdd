//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the mode cycle, gesture detector, backlight timer,
//! telemetry history, and render pipeline.  It exposes a clean,
//! hardware-agnostic API.  All I/O flows through port traits injected at
//! call sites, making the entire service testable with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                  │         AppService          │
//!  DisplayPort ◀── │  gesture · modes · history  │
//!                  └────────────────────────────┘
//! ```

use log::{info, warn};

use crate::backlight::BacklightTimer;
use crate::config::SystemConfig;
use crate::error::Result;
use crate::gesture::{GestureDetector, ShutdownStage};
use crate::modes::{DisplayMode, ModeCycle, Variable};
use crate::render::RenderPipeline;
use crate::telemetry::TelemetryStore;

use super::events::{AppEvent, TelemetryData};
use super::ports::{DisplayPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// Tick outcome
// ───────────────────────────────────────────────────────────────

/// Result of one control cycle.  `Shutdown` is terminal: the caller owns
/// exit sequencing (invoking the privileged power-off, breaking the loop),
/// which keeps the core testable without ever powering anything down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Shutdown,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all interaction logic.
pub struct AppService {
    config: SystemConfig,
    /// Seconds per control tick (derived from config).
    tick_secs: f32,
    modes: ModeCycle,
    gesture: GestureDetector,
    backlight: BacklightTimer,
    store: TelemetryStore,
    render: RenderPipeline,
    stage: ShutdownStage,
    /// Mode at the end of the previous tick — switch detection for the
    /// history reset and the overlay redraw rule.
    prev_mode: DisplayMode,
    /// Last good proximity reading, reused on a failed read.
    last_proximity: u16,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    pub fn new(config: SystemConfig) -> Self {
        let tick_secs = config.tick_secs();
        let backlight = BacklightTimer::new(config.backlight_timeout_secs);
        let modes = ModeCycle::new();
        let prev_mode = modes.current();
        Self {
            config,
            tick_secs,
            modes,
            gesture: GestureDetector::new(),
            backlight,
            store: TelemetryStore::new(),
            render: RenderPipeline::new(),
            stage: ShutdownStage::Idle,
            prev_mode,
            last_proximity: 0,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce the initial state.  Call once before the first `tick()`.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started(self.modes.current()));
        info!("AppService started in {:?}", self.modes.current());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`DisplayPort`] — this avoids a double mutable borrow while
    /// keeping the port boundary explicit.  Order per cycle: proximity →
    /// backlight idle check → gesture → onset routing → shutdown stage →
    /// telemetry/overlay content → previous-mode snapshot.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + DisplayPort),
        sink: &mut impl EventSink,
    ) -> Result<TickOutcome> {
        self.tick_count += 1;

        // 1. Proximity feeds the gesture and the light channel's
        //    occlusion guard.  A failed read reuses the previous value.
        let proximity = match hw.read_proximity() {
            Ok(p) => {
                self.last_proximity = p;
                p
            }
            Err(e) => {
                warn!(
                    "proximity read failed ({e}), reusing {}",
                    self.last_proximity
                );
                self.last_proximity
            }
        };

        // 2. Backlight idle policy.  Exactly one blank frame on the off
        //    edge; all further rendering is suppressed until wake.
        if self.backlight.tick(self.tick_secs) {
            hw.set_backlight(false);
            hw.push_frame(self.render.blank())?;
            sink.emit(&AppEvent::BacklightChanged { on: false });
            info!(
                "backlight off after {:.0}s without a gesture",
                self.config.backlight_timeout_secs
            );
        }

        // 3. Gesture update.
        let gesture = self.gesture.update(
            proximity,
            self.config.proximity_threshold,
            self.tick_secs,
        );

        // 4. Onset routing: waking the backlight consumes the onset
        //    entirely — the mode never advances on a wake.
        if gesture.onset {
            if self.backlight.is_on() {
                let from = self.modes.current();
                let to = self.modes.advance();
                self.backlight.touch();
                sink.emit(&AppEvent::ModeChanged { from, to });
            } else {
                self.backlight.reactivate();
                hw.set_backlight(true);
                sink.emit(&AppEvent::BacklightChanged { on: true });
            }
        }

        // 5. Shutdown gesture, a pure function of contact duration.
        let stage = ShutdownStage::classify(
            gesture.contact_secs,
            self.config.shutdown_warn_secs,
            self.config.shutdown_confirm_secs,
        );
        if stage != self.stage {
            sink.emit(&AppEvent::ShutdownStageChanged {
                from: self.stage,
                to: stage,
            });
            self.stage = stage;
        }
        if stage == ShutdownStage::Confirmed {
            if self.backlight.is_on() {
                let frame = match self.modes.current() {
                    DisplayMode::Telemetry(variable) => self.render.telemetry(
                        variable,
                        self.store.latest(variable),
                        self.store.buffer(variable),
                        stage,
                    ),
                    DisplayMode::Overlay(page) => self.render.overlay(page, stage),
                };
                hw.push_frame(frame)?;
            }
            sink.emit(&AppEvent::ShutdownConfirmed);
            info!("shutdown gesture confirmed after {:.2}s", gesture.contact_secs);
            return Ok(TickOutcome::Shutdown);
        }

        // 6. Content.  Telemetry history accrues even while the backlight
        //    is dark; only the rendering work is suppressed.
        let mode = self.modes.current();
        let mode_changed = mode != self.prev_mode;
        match mode {
            DisplayMode::Telemetry(variable) => {
                let sample = self.sample(hw, variable, proximity, sink);
                self.store.record(variable, sample, mode_changed);
                if self.backlight.is_on() {
                    sink.emit(&AppEvent::Telemetry(TelemetryData {
                        variable,
                        value: sample,
                        unit: variable.unit(),
                    }));
                    let frame = self.render.telemetry(
                        variable,
                        sample,
                        self.store.buffer(variable),
                        self.stage,
                    );
                    hw.push_frame(frame)?;
                }
            }
            DisplayMode::Overlay(page) => {
                // Static content: redraw only on mode change, or while a
                // shutdown overlay has to stay visible.
                if self.backlight.is_on() && (mode_changed || self.stage != ShutdownStage::Idle)
                {
                    hw.push_frame(self.render.overlay(page, self.stage))?;
                }
            }
        }

        // 7. Snapshot for the next tick's switch detection.
        self.prev_mode = mode;
        Ok(TickOutcome::Continue)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.modes.current()
    }

    /// Position in the mode cycle.
    pub fn mode_index(&self) -> usize {
        self.modes.index()
    }

    /// Current shutdown gesture stage.
    pub fn shutdown_stage(&self) -> ShutdownStage {
        self.stage
    }

    /// Whether the backlight is currently on.
    pub fn backlight_on(&self) -> bool {
        self.backlight.is_on()
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Most recent recorded sample for a variable.
    pub fn latest_sample(&self, variable: Variable) -> f32 {
        self.store.latest(variable)
    }

    // ── Internal ──────────────────────────────────────────────

    /// Read the active channel and apply its value-derivation rule.  A
    /// failed read logs, emits an event, and reuses the previous sample.
    fn sample(
        &mut self,
        hw: &mut impl SensorPort,
        variable: Variable,
        proximity: u16,
        sink: &mut impl EventSink,
    ) -> f32 {
        let reading = match variable {
            Variable::Temperature => hw
                .read_temperature()
                .map(|t| t - self.config.temperature_offset_c),
            Variable::Pressure => hw.read_pressure(),
            Variable::Humidity => hw.read_humidity(),
            // A hovering hand floods the light sensor, so any meaningful
            // proximity pins the sample instead of reading a false spike.
            Variable::Light => {
                if proximity < self.config.light_occlusion_proximity {
                    hw.read_lux()
                } else {
                    Ok(1.0)
                }
            }
            Variable::Oxidising => hw.read_gas().map(|g| g.oxidising / 1000.0),
            Variable::Reducing => hw.read_gas().map(|g| g.reducing / 1000.0),
            Variable::Nh3 => hw.read_gas().map(|g| g.nh3 / 1000.0),
        };

        match reading {
            Ok(value) => value,
            Err(error) => {
                let previous = self.store.latest(variable);
                warn!(
                    "{} read failed ({error}), reusing {previous:.1}",
                    variable.label()
                );
                sink.emit(&AppEvent::SensorReadFailed { variable, error });
                previous
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::GasReading;
    use crate::error::{RenderError, SensorError};
    use crate::render::FrameBuffer;
    use core::result::Result;

    struct StubHw {
        proximity: u16,
        frames: usize,
    }

    impl StubHw {
        fn new() -> Self {
            Self {
                proximity: 0,
                frames: 0,
            }
        }
    }

    impl SensorPort for StubHw {
        fn read_proximity(&mut self) -> Result<u16, SensorError> {
            Ok(self.proximity)
        }
        fn read_lux(&mut self) -> Result<f32, SensorError> {
            Ok(120.0)
        }
        fn read_temperature(&mut self) -> Result<f32, SensorError> {
            Ok(28.0)
        }
        fn read_pressure(&mut self) -> Result<f32, SensorError> {
            Ok(1013.2)
        }
        fn read_humidity(&mut self) -> Result<f32, SensorError> {
            Ok(40.0)
        }
        fn read_gas(&mut self) -> Result<GasReading, SensorError> {
            Ok(GasReading {
                oxidising: 20_000.0,
                reducing: 450_000.0,
                nh3: 120_000.0,
            })
        }
    }

    impl DisplayPort for StubHw {
        fn set_backlight(&mut self, _on: bool) {}
        fn push_frame(&mut self, _frame: &FrameBuffer) -> Result<(), RenderError> {
            self.frames += 1;
            Ok(())
        }
    }

    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[test]
    fn telemetry_tick_pushes_a_frame() {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = StubHw::new();
        let mut sink = NullSink;
        app.start(&mut sink);
        assert_eq!(app.tick(&mut hw, &mut sink).unwrap(), TickOutcome::Continue);
        assert_eq!(hw.frames, 1);
    }

    #[test]
    fn temperature_offset_is_applied() {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = StubHw::new();
        let mut sink = NullSink;
        app.start(&mut sink);
        app.tick(&mut hw, &mut sink).unwrap();
        // Raw 28.0 minus the fixed 5.0 calibration offset.
        assert!((app.latest_sample(Variable::Temperature) - 23.0).abs() < 1e-6);
    }

    #[test]
    fn onset_with_backlight_on_advances_mode() {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = StubHw::new();
        let mut sink = NullSink;
        app.start(&mut sink);
        hw.proximity = 2000;
        app.tick(&mut hw, &mut sink).unwrap();
        assert_eq!(app.mode_index(), 1);
        // Continued contact is not a new onset.
        app.tick(&mut hw, &mut sink).unwrap();
        assert_eq!(app.mode_index(), 1);
    }
}
