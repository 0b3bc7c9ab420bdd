//! Display mode model and cyclic mode selection.
//!
//! The pod cycles through ten modes: seven telemetry modes, each bound to
//! one sensor variable, followed by three static overlay pages.  Modes are
//! a tagged enum dispatched by pattern match — adding a mode is a data
//! change, not a control-flow change.

/// One sensor variable with its display label and unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Variable {
    Temperature = 0,
    Pressure = 1,
    Humidity = 2,
    Light = 3,
    Oxidising = 4,
    Reducing = 5,
    Nh3 = 6,
}

impl Variable {
    /// Total number of telemetry variables — sizes the history store.
    pub const COUNT: usize = 7;

    pub const ALL: [Variable; Self::COUNT] = [
        Self::Temperature,
        Self::Pressure,
        Self::Humidity,
        Self::Light,
        Self::Oxidising,
        Self::Reducing,
        Self::Nh3,
    ];

    /// Index into per-variable storage.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Human-readable channel name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Temperature => "Temperature",
            Self::Pressure => "Pressure",
            Self::Humidity => "Humidity",
            Self::Light => "Light",
            Self::Oxidising => "Oxidised",
            Self::Reducing => "Reduced",
            Self::Nh3 => "NH3",
        }
    }

    /// Display unit. The gas channels print "kO" — the panel's 8-px mono
    /// font carries no omega glyph.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Temperature => "°C",
            Self::Pressure => "hPa",
            Self::Humidity => "%",
            Self::Light => "Lux",
            Self::Oxidising | Self::Reducing | Self::Nh3 => "kO",
        }
    }
}

/// Static overlay pages shown after the telemetry modes in the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayPage {
    About,
    SensorGuide,
    GestureHelp,
}

/// A display mode: either live telemetry for one variable, or a static
/// overlay page redrawn only on mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    Telemetry(Variable),
    Overlay(OverlayPage),
}

impl DisplayMode {
    /// Total number of modes in the cycle.
    pub const COUNT: usize = 10;

    /// Mode at a given cycle position.  Panics on out-of-range in debug
    /// builds; wraps in release (safe fallback).
    pub fn from_index(idx: usize) -> Self {
        debug_assert!(idx < Self::COUNT, "invalid mode index: {idx}");
        match idx % Self::COUNT {
            0 => Self::Telemetry(Variable::Temperature),
            1 => Self::Telemetry(Variable::Pressure),
            2 => Self::Telemetry(Variable::Humidity),
            3 => Self::Telemetry(Variable::Light),
            4 => Self::Telemetry(Variable::Oxidising),
            5 => Self::Telemetry(Variable::Reducing),
            6 => Self::Telemetry(Variable::Nh3),
            7 => Self::Overlay(OverlayPage::About),
            8 => Self::Overlay(OverlayPage::SensorGuide),
            _ => Self::Overlay(OverlayPage::GestureHelp),
        }
    }
}

/// Cyclic mode selector.  Advanced only by a gesture onset while the
/// backlight is already on; never changes on any other event.
#[derive(Debug, Clone)]
pub struct ModeCycle {
    index: usize,
}

impl ModeCycle {
    pub fn new() -> Self {
        Self { index: 0 }
    }

    pub fn current(&self) -> DisplayMode {
        DisplayMode::from_index(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Step to the next mode in the cycle and return it.
    pub fn advance(&mut self) -> DisplayMode {
        self.index = (self.index + 1) % DisplayMode::COUNT;
        self.current()
    }
}

impl Default for ModeCycle {
    fn default() -> Self {
        Self::new()
    }
}
