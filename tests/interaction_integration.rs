//! Integration tests: AppService → gesture/backlight/mode/shutdown → ports.

use enviropod::app::events::AppEvent;
use enviropod::app::ports::{DisplayPort, EventSink, GasReading, SensorPort};
use enviropod::app::service::{AppService, TickOutcome};
use enviropod::config::SystemConfig;
use enviropod::error::{RenderError, SensorError};
use enviropod::gesture::ShutdownStage;
use enviropod::modes::{DisplayMode, Variable};
use enviropod::render::FrameBuffer;

// ── Mock implementations ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Blank,
    Content,
}

struct MockHw {
    proximity: u16,
    lux: f32,
    temperature: f32,
    pressure: f32,
    humidity: f32,
    gas: GasReading,
    fail_temperature: bool,
    backlight_calls: Vec<bool>,
    frames: Vec<FrameKind>,
}

impl MockHw {
    fn new() -> Self {
        Self {
            proximity: 0,
            lux: 120.0,
            temperature: 30.0,
            pressure: 1011.0,
            humidity: 48.0,
            gas: GasReading {
                oxidising: 20_000.0,
                reducing: 450_000.0,
                nh3: 120_000.0,
            },
            fail_temperature: false,
            backlight_calls: Vec::new(),
            frames: Vec::new(),
        }
    }
}

impl SensorPort for MockHw {
    fn read_proximity(&mut self) -> Result<u16, SensorError> {
        Ok(self.proximity)
    }
    fn read_lux(&mut self) -> Result<f32, SensorError> {
        Ok(self.lux)
    }
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        if self.fail_temperature {
            Err(SensorError::BusReadFailed)
        } else {
            Ok(self.temperature)
        }
    }
    fn read_pressure(&mut self) -> Result<f32, SensorError> {
        Ok(self.pressure)
    }
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        Ok(self.humidity)
    }
    fn read_gas(&mut self) -> Result<GasReading, SensorError> {
        Ok(self.gas)
    }
}

impl DisplayPort for MockHw {
    fn set_backlight(&mut self, on: bool) {
        self.backlight_calls.push(on);
    }
    fn push_frame(&mut self, frame: &FrameBuffer) -> Result<(), RenderError> {
        self.frames.push(if frame.is_blank() {
            FrameKind::Blank
        } else {
            FrameKind::Content
        });
        Ok(())
    }
}

struct RecordingSink {
    events: Vec<AppEvent>,
}

impl RecordingSink {
    fn new() -> Self {
        Self { events: Vec::new() }
    }

    fn mode_changes(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::ModeChanged { .. }))
            .count()
    }

    fn stage_reached(&self, stage: ShutdownStage) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, AppEvent::ShutdownStageChanged { to, .. } if *to == stage))
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

fn make_app() -> (AppService, MockHw, RecordingSink) {
    let mut app = AppService::new(SystemConfig::default());
    let hw = MockHw::new();
    let mut sink = RecordingSink::new();
    app.start(&mut sink);
    (app, hw, sink)
}

fn run_ticks(app: &mut AppService, hw: &mut MockHw, sink: &mut RecordingSink, n: usize) {
    for _ in 0..n {
        assert_eq!(app.tick(hw, sink).unwrap(), TickOutcome::Continue);
    }
}

/// Drive the backlight into its idle-off state (241 quiet ticks).
fn idle_until_dark(app: &mut AppService, hw: &mut MockHw, sink: &mut RecordingSink) {
    hw.proximity = 0;
    run_ticks(app, hw, sink, 241);
    assert!(!app.backlight_on());
}

// ── Single contact: one onset, one mode advance ──────────────

#[test]
fn single_contact_advances_mode_exactly_once() {
    let (mut app, mut hw, mut sink) = make_app();
    let start_index = app.mode_index();

    hw.proximity = 2000;
    run_ticks(&mut app, &mut hw, &mut sink, 1);
    hw.proximity = 0;
    run_ticks(&mut app, &mut hw, &mut sink, 9);

    assert_eq!(app.mode_index(), (start_index + 1) % DisplayMode::COUNT);
    assert_eq!(sink.mode_changes(), 1);
}

#[test]
fn sustained_contact_still_advances_only_once() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.proximity = 2000;
    run_ticks(&mut app, &mut hw, &mut sink, 10);

    assert_eq!(app.mode_index(), 1);
    assert_eq!(sink.mode_changes(), 1);
}

#[test]
fn mode_is_invariant_without_onsets() {
    let (mut app, mut hw, mut sink) = make_app();
    run_ticks(&mut app, &mut hw, &mut sink, 50);
    assert_eq!(app.mode_index(), 0);
    assert_eq!(sink.mode_changes(), 0);
}

// ── Shutdown gesture: warn at 13 ticks, confirm at 25 ────────

#[test]
fn warn_reached_on_thirteenth_contact_tick_with_dark_screen() {
    let (mut app, mut hw, mut sink) = make_app();
    idle_until_dark(&mut app, &mut hw, &mut sink);
    sink.events.clear();

    hw.proximity = 2000;
    run_ticks(&mut app, &mut hw, &mut sink, 12);
    assert_eq!(app.shutdown_stage(), ShutdownStage::Idle);

    run_ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.shutdown_stage(), ShutdownStage::Warn);

    // The wake consumed the onset: backlight came on, mode untouched.
    assert!(app.backlight_on());
    assert_eq!(app.mode_index(), 0);
    assert_eq!(sink.mode_changes(), 0);
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::BacklightChanged { on: true }))
    );
}

#[test]
fn confirm_on_twentyfifth_tick_terminates_the_loop() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.proximity = 2000;
    for tick in 1..=25 {
        let outcome = app.tick(&mut hw, &mut sink).unwrap();
        if tick < 25 {
            assert_eq!(outcome, TickOutcome::Continue, "tick {tick}");
        } else {
            assert_eq!(outcome, TickOutcome::Shutdown);
        }
    }

    assert!(sink.stage_reached(ShutdownStage::Warn));
    assert!(sink.stage_reached(ShutdownStage::Confirmed));
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::ShutdownConfirmed))
    );
    // The confirming contact's onset happened with the backlight on, so
    // the mode advanced exactly once at contact start.
    assert_eq!(sink.mode_changes(), 1);
}

#[test]
fn release_before_confirm_cancels_the_gesture() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.proximity = 2000;
    run_ticks(&mut app, &mut hw, &mut sink, 14);
    assert_eq!(app.shutdown_stage(), ShutdownStage::Warn);

    hw.proximity = 0;
    run_ticks(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.shutdown_stage(), ShutdownStage::Idle);

    // A fresh hold starts from zero: warn needs the full 13 ticks again.
    hw.proximity = 2000;
    run_ticks(&mut app, &mut hw, &mut sink, 12);
    assert_eq!(app.shutdown_stage(), ShutdownStage::Idle);
}

// ── Backlight idle policy ─────────────────────────────────────

#[test]
fn idle_timeout_renders_one_blank_frame_then_nothing() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.proximity = 0;
    run_ticks(&mut app, &mut hw, &mut sink, 244);

    // 240 content frames, then the single blank frame on the off edge.
    assert_eq!(hw.frames.len(), 241);
    assert_eq!(hw.frames[240], FrameKind::Blank);
    assert!(hw.frames[..240].iter().all(|f| *f == FrameKind::Content));
    assert_eq!(hw.backlight_calls, vec![false]);

    // Further telemetry ticks render nothing until the next onset.
    run_ticks(&mut app, &mut hw, &mut sink, 20);
    assert_eq!(hw.frames.len(), 241);
}

#[test]
fn wake_resumes_rendering_without_mode_change() {
    let (mut app, mut hw, mut sink) = make_app();
    idle_until_dark(&mut app, &mut hw, &mut sink);
    let dark_frames = hw.frames.len();

    hw.proximity = 2000;
    run_ticks(&mut app, &mut hw, &mut sink, 1);
    hw.proximity = 0;
    run_ticks(&mut app, &mut hw, &mut sink, 3);

    assert!(app.backlight_on());
    assert_eq!(app.mode_index(), 0);
    assert!(hw.frames.len() > dark_frames);
    assert_eq!(*hw.backlight_calls.last().unwrap(), true);
}

#[test]
fn telemetry_accrues_while_the_screen_is_dark() {
    let (mut app, mut hw, mut sink) = make_app();
    idle_until_dark(&mut app, &mut hw, &mut sink);

    hw.temperature = 40.0;
    run_ticks(&mut app, &mut hw, &mut sink, 1);

    // Sample rule still applies (raw − 5.0 offset) even with no rendering.
    assert!((app.latest_sample(Variable::Temperature) - 35.0).abs() < 1e-6);
}

// ── Overlay modes: redraw on change only ─────────────────────

#[test]
fn overlay_mode_renders_once_until_next_change() {
    let (mut app, mut hw, mut sink) = make_app();

    // Seven quick waves land on the first overlay page (index 7).
    for _ in 0..7 {
        hw.proximity = 2000;
        run_ticks(&mut app, &mut hw, &mut sink, 1);
        hw.proximity = 0;
        run_ticks(&mut app, &mut hw, &mut sink, 1);
    }
    assert!(matches!(app.mode(), DisplayMode::Overlay(_)));

    let frames_after_switch = hw.frames.len();
    run_ticks(&mut app, &mut hw, &mut sink, 10);
    assert_eq!(
        hw.frames.len(),
        frames_after_switch,
        "static overlay must not re-push unchanged frames"
    );
}

// ── Channel value rules ───────────────────────────────────────

#[test]
fn light_mode_reads_lux_only_when_unoccluded() {
    let (mut app, mut hw, mut sink) = make_app();

    // Three waves to reach the Light mode (index 3).
    for _ in 0..3 {
        hw.proximity = 2000;
        run_ticks(&mut app, &mut hw, &mut sink, 1);
        hw.proximity = 0;
        run_ticks(&mut app, &mut hw, &mut sink, 1);
    }
    assert_eq!(app.mode(), DisplayMode::Telemetry(Variable::Light));

    hw.proximity = 0;
    hw.lux = 500.0;
    run_ticks(&mut app, &mut hw, &mut sink, 1);
    assert!((app.latest_sample(Variable::Light) - 500.0).abs() < 1e-6);

    // Something hovering (below the gesture threshold, above the
    // occlusion threshold) pins the sample to 1.
    hw.proximity = 50;
    run_ticks(&mut app, &mut hw, &mut sink, 1);
    assert!((app.latest_sample(Variable::Light) - 1.0).abs() < 1e-6);
}

#[test]
fn gas_modes_scale_resistance_to_kilohms() {
    let (mut app, mut hw, mut sink) = make_app();

    for _ in 0..4 {
        hw.proximity = 2000;
        run_ticks(&mut app, &mut hw, &mut sink, 1);
        hw.proximity = 0;
        run_ticks(&mut app, &mut hw, &mut sink, 1);
    }
    assert_eq!(app.mode(), DisplayMode::Telemetry(Variable::Oxidising));

    run_ticks(&mut app, &mut hw, &mut sink, 1);
    assert!((app.latest_sample(Variable::Oxidising) - 20.0).abs() < 1e-6);
}

// ── Sensor failure hardening ──────────────────────────────────

#[test]
fn failed_read_reuses_previous_sample_and_keeps_running() {
    let (mut app, mut hw, mut sink) = make_app();

    run_ticks(&mut app, &mut hw, &mut sink, 1);
    let before = app.latest_sample(Variable::Temperature);

    hw.fail_temperature = true;
    run_ticks(&mut app, &mut hw, &mut sink, 5);

    assert_eq!(app.latest_sample(Variable::Temperature), before);
    assert!(
        sink.events
            .iter()
            .any(|e| matches!(e, AppEvent::SensorReadFailed { variable: Variable::Temperature, .. }))
    );

    hw.fail_temperature = false;
    hw.temperature = 20.0;
    run_ticks(&mut app, &mut hw, &mut sink, 1);
    assert!((app.latest_sample(Variable::Temperature) - 15.0).abs() < 1e-6);
}
