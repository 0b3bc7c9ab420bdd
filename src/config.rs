//! System configuration parameters
//!
//! All tunable parameters for the enviropod interaction engine. The
//! defaults are the shipping values; the struct stays serialisable so a
//! diagnostic dump can report the active configuration.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Control loop tick interval (milliseconds)
    pub tick_interval_ms: u32,

    // --- Proximity gesture ---
    /// Proximity counts above which a contact episode is in progress
    pub proximity_threshold: u16,
    /// Continuous contact (seconds) before the shutdown warning shows
    pub shutdown_warn_secs: f32,
    /// Continuous contact (seconds) before shutdown is confirmed
    pub shutdown_confirm_secs: f32,

    // --- Backlight ---
    /// Seconds without a gesture onset before the backlight powers off
    pub backlight_timeout_secs: f32,

    // --- Channel calibration ---
    /// Fixed additive offset subtracted from the raw temperature (°C)
    pub temperature_offset_c: f32,
    /// Proximity counts above which the light channel reads as occluded
    /// (a hovering hand floods the sensor, so the sample is pinned to 1)
    pub light_occlusion_proximity: u16,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Timing
            tick_interval_ms: 250, // 4 Hz

            // Proximity gesture
            proximity_threshold: 1500,
            shutdown_warn_secs: 3.0,
            shutdown_confirm_secs: 6.0,

            // Backlight
            backlight_timeout_secs: 60.0,

            // Channel calibration
            temperature_offset_c: 5.0,
            light_occlusion_proximity: 10,
        }
    }
}

impl SystemConfig {
    /// Duration of one tick in seconds.
    pub fn tick_secs(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.tick_interval_ms > 0);
        assert!(c.proximity_threshold > 0);
        assert!(c.shutdown_warn_secs > 0.0);
        assert!(c.backlight_timeout_secs > 0.0);
        assert!(c.light_occlusion_proximity < c.proximity_threshold);
    }

    #[test]
    fn warn_below_confirm_invariant() {
        let c = SystemConfig::default();
        assert!(
            c.shutdown_warn_secs < c.shutdown_confirm_secs,
            "warning must precede confirmation or the hold gesture has no warn phase"
        );
    }

    #[test]
    fn warn_phase_spans_multiple_ticks() {
        let c = SystemConfig::default();
        let warn_ticks = (c.shutdown_confirm_secs - c.shutdown_warn_secs) / c.tick_secs();
        assert!(
            warn_ticks >= 4.0,
            "warn phase must be long enough for the user to release"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.tick_interval_ms, c2.tick_interval_ms);
        assert_eq!(c.proximity_threshold, c2.proximity_threshold);
        assert!((c.shutdown_confirm_secs - c2.shutdown_confirm_secs).abs() < 0.001);
    }
}
