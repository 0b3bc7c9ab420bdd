//! Touch-free proximity gesture detection.
//!
//! The LTR-559's proximity channel is sampled once per control tick. A
//! reading above the configured threshold means "something is hovering";
//! the detector turns that stream into two signals:
//!
//! - **onset** — true exactly on the tick where a contact episode begins.
//!   Each physical touch yields one onset regardless of how long it lasts,
//!   which is what gives one mode advance (or one backlight wake) per wave.
//! - **contact duration** — seconds of uninterrupted contact, accumulating
//!   at tick granularity. Feeds the hold-to-shut-down gesture.
//!
//! Dropping to or below the threshold resets the duration immediately, so
//! releasing before the confirm threshold fully cancels a shutdown hold.

// ---------------------------------------------------------------------------
// Gesture detector
// ---------------------------------------------------------------------------

/// Per-tick output of the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    /// True exactly once per uninterrupted contact episode, on its first tick.
    pub onset: bool,
    /// Seconds of continuous contact including this tick; 0.0 when idle.
    pub contact_secs: f32,
}

/// Converts the proximity intensity stream into onset events and
/// continuous-contact duration.
#[derive(Debug, Clone)]
pub struct GestureDetector {
    contact_secs: f32,
}

impl GestureDetector {
    pub fn new() -> Self {
        Self { contact_secs: 0.0 }
    }

    /// Feed one proximity sample. `tick_secs` is the fixed control period.
    pub fn update(&mut self, proximity: u16, threshold: u16, tick_secs: f32) -> GestureSample {
        if proximity > threshold {
            let onset = self.contact_secs == 0.0;
            self.contact_secs += tick_secs;
            GestureSample {
                onset,
                contact_secs: self.contact_secs,
            }
        } else {
            self.contact_secs = 0.0;
            GestureSample {
                onset: false,
                contact_secs: 0.0,
            }
        }
    }

    /// Seconds of continuous contact as of the last update.
    pub fn contact_secs(&self) -> f32 {
        self.contact_secs
    }
}

impl Default for GestureDetector {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Shutdown gesture stages
// ---------------------------------------------------------------------------

/// Hold-to-confirm shutdown state, a pure function of contact duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStage {
    Idle,
    /// Contact held past the warn threshold — overlay "Hold to shut down".
    Warn,
    /// Contact held past the confirm threshold — power off.
    Confirmed,
}

impl ShutdownStage {
    /// Classify a contact duration against the configured thresholds.
    pub fn classify(contact_secs: f32, warn_secs: f32, confirm_secs: f32) -> Self {
        if contact_secs > confirm_secs {
            Self::Confirmed
        } else if contact_secs > warn_secs {
            Self::Warn
        } else {
            Self::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 0.25;
    const THRESHOLD: u16 = 1500;

    #[test]
    fn no_onset_below_threshold() {
        let mut g = GestureDetector::new();
        for _ in 0..10 {
            let s = g.update(THRESHOLD, THRESHOLD, TICK);
            assert!(!s.onset);
            assert_eq!(s.contact_secs, 0.0);
        }
    }

    #[test]
    fn onset_fires_once_per_episode() {
        let mut g = GestureDetector::new();
        let first = g.update(2000, THRESHOLD, TICK);
        assert!(first.onset);
        for _ in 0..20 {
            assert!(!g.update(2000, THRESHOLD, TICK).onset);
        }
    }

    #[test]
    fn duration_accumulates_per_tick() {
        let mut g = GestureDetector::new();
        for tick in 1..=13 {
            let s = g.update(2000, THRESHOLD, TICK);
            assert!((s.contact_secs - tick as f32 * TICK).abs() < 1e-6);
        }
    }

    #[test]
    fn release_resets_duration_and_rearms_onset() {
        let mut g = GestureDetector::new();
        g.update(2000, THRESHOLD, TICK);
        g.update(2000, THRESHOLD, TICK);
        let released = g.update(0, THRESHOLD, TICK);
        assert_eq!(released.contact_secs, 0.0);
        assert!(!released.onset);
        assert!(g.update(2000, THRESHOLD, TICK).onset);
    }

    #[test]
    fn stage_thresholds() {
        assert_eq!(ShutdownStage::classify(0.0, 3.0, 6.0), ShutdownStage::Idle);
        assert_eq!(ShutdownStage::classify(3.0, 3.0, 6.0), ShutdownStage::Idle);
        assert_eq!(ShutdownStage::classify(3.25, 3.0, 6.0), ShutdownStage::Warn);
        assert_eq!(ShutdownStage::classify(6.0, 3.0, 6.0), ShutdownStage::Warn);
        assert_eq!(ShutdownStage::classify(6.25, 3.0, 6.0), ShutdownStage::Confirmed);
    }

    #[test]
    fn warn_reached_on_thirteenth_tick() {
        let mut g = GestureDetector::new();
        let mut warn_tick = None;
        for tick in 1..=13 {
            let s = g.update(2000, THRESHOLD, TICK);
            if ShutdownStage::classify(s.contact_secs, 3.0, 6.0) == ShutdownStage::Warn {
                warn_tick.get_or_insert(tick);
            }
        }
        assert_eq!(warn_tick, Some(13));
    }
}
