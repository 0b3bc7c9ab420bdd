//! Per-variable rolling sample history.
//!
//! Each telemetry variable keeps a fixed window of its most recent samples,
//! sized so one sample maps to one graph column on the panel.  The window
//! is always exactly full: it seeds to 1.0 at boot, refills with the newest
//! sample on a mode switch (stale history would paint a misleading gradient
//! the instant a channel becomes visible), and otherwise behaves as a FIFO.
//!
//! Normalisation maps the window into `(0, 1]` for the colour ramp and the
//! line-graph height:
//!
//! ```text
//! norm_i = (v_i - min + 1) / (max - min + 1)
//! ```
//!
//! The `+1` offsets keep the quotient defined when every sample is equal
//! (all `norm_i` collapse to 1).

use crate::modes::Variable;
use crate::pins;
use crate::render::GRAPH_COLUMN_PX;

/// Samples per window — one per graph column across the panel width.
pub const WINDOW: usize = pins::LCD_WIDTH_PX / GRAPH_COLUMN_PX;

/// Seed value for never-written history, matching the boot state of the
/// display (a flat line until real samples arrive).
const SEED_SAMPLE: f32 = 1.0;

// ---------------------------------------------------------------------------
// RollingBuffer
// ---------------------------------------------------------------------------

/// Fixed-capacity ring over the last [`WINDOW`] samples of one variable.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    samples: [f32; WINDOW],
    /// Index of the oldest sample.
    head: usize,
}

impl RollingBuffer {
    pub fn new() -> Self {
        Self {
            samples: [SEED_SAMPLE; WINDOW],
            head: 0,
        }
    }

    /// Length is a constant — the window is always exactly full.
    pub fn len(&self) -> usize {
        WINDOW
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Erase history: every slot becomes `value`.
    pub fn fill(&mut self, value: f32) {
        self.samples = [value; WINDOW];
        self.head = 0;
    }

    /// FIFO append: the oldest sample is dropped, `value` becomes newest.
    pub fn push(&mut self, value: f32) {
        self.samples[self.head] = value;
        self.head = (self.head + 1) % WINDOW;
    }

    /// Sample at window position `i`, oldest first.
    pub fn get(&self, i: usize) -> f32 {
        self.samples[(self.head + i) % WINDOW]
    }

    /// The most recent sample.
    pub fn latest(&self) -> f32 {
        self.get(WINDOW - 1)
    }

    /// Per-sample display weights in `(0, 1]`, oldest first.
    pub fn normalised(&self) -> [f32; WINDOW] {
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for &v in &self.samples {
            min = min.min(v);
            max = max.max(v);
        }
        let span = max - min + 1.0;
        let mut out = [0.0; WINDOW];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (self.get(i) - min + 1.0) / span;
        }
        out
    }
}

impl Default for RollingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// TelemetryStore
// ---------------------------------------------------------------------------

/// One rolling buffer per telemetry variable.
#[derive(Debug, Clone)]
pub struct TelemetryStore {
    buffers: [RollingBuffer; Variable::COUNT],
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self {
            buffers: core::array::from_fn(|_| RollingBuffer::new()),
        }
    }

    /// Record one sample.  `reinitialise` is set on the tick where the
    /// variable's mode just became visible, erasing stale history.
    pub fn record(&mut self, variable: Variable, sample: f32, reinitialise: bool) {
        let buffer = &mut self.buffers[variable.index()];
        if reinitialise {
            buffer.fill(sample);
        }
        buffer.push(sample);
    }

    pub fn buffer(&self, variable: Variable) -> &RollingBuffer {
        &self.buffers[variable.index()]
    }

    /// Most recent sample for a variable — reused verbatim when a sensor
    /// read fails so a flaky reading never stalls the loop.
    pub fn latest(&self, variable: Variable) -> f32 {
        self.buffers[variable.index()].latest()
    }
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_matches_panel_geometry() {
        // 160px wide panel, 4px columns.
        assert_eq!(WINDOW, 40);
    }

    #[test]
    fn length_is_invariant_under_updates() {
        let mut buf = RollingBuffer::new();
        assert_eq!(buf.len(), WINDOW);
        buf.push(12.5);
        assert_eq!(buf.len(), WINDOW);
        buf.fill(3.0);
        assert_eq!(buf.len(), WINDOW);
    }

    #[test]
    fn push_drops_oldest_keeps_order() {
        let mut buf = RollingBuffer::new();
        for i in 0..WINDOW {
            buf.push(i as f32);
        }
        assert_eq!(buf.get(0), 0.0);
        assert_eq!(buf.latest(), (WINDOW - 1) as f32);
        buf.push(100.0);
        assert_eq!(buf.get(0), 1.0);
        assert_eq!(buf.latest(), 100.0);
    }

    #[test]
    fn equal_window_normalises_to_one() {
        let mut buf = RollingBuffer::new();
        buf.fill(10.0);
        for norm in buf.normalised() {
            assert_eq!(norm, 1.0);
        }
    }

    #[test]
    fn normalised_values_stay_in_half_open_unit_interval() {
        let mut buf = RollingBuffer::new();
        for i in 0..WINDOW {
            buf.push((i as f32) * 7.3 - 50.0);
        }
        for norm in buf.normalised() {
            assert!(norm > 0.0 && norm <= 1.0, "norm out of range: {norm}");
        }
    }

    #[test]
    fn extremes_map_to_window_bounds() {
        let mut buf = RollingBuffer::new();
        buf.fill(0.0);
        buf.push(9.0);
        let norms = buf.normalised();
        // max sample → 1.0, min samples → 1/(span+1)
        assert_eq!(norms[WINDOW - 1], 1.0);
        assert!((norms[0] - 0.1).abs() < 1e-6);
    }

    #[test]
    fn store_reinitialise_erases_history() {
        let mut store = TelemetryStore::new();
        store.record(Variable::Humidity, 80.0, false);
        store.record(Variable::Humidity, 20.0, true);
        let buf = store.buffer(Variable::Humidity);
        for i in 0..WINDOW {
            assert_eq!(buf.get(i), 20.0);
        }
    }

    #[test]
    fn store_seeds_latest_to_one() {
        let store = TelemetryStore::new();
        for var in Variable::ALL {
            assert_eq!(store.latest(var), 1.0);
        }
    }
}
