//! Configuration surface (spec.md §6). No env var reads — a `Config` value
//! is threaded explicitly into `detect`, per the "Global mutable
//! configuration" redesign note in spec.md §9.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    pub min_area: f64,
    pub min_perimeter: f64,
    pub epsilon_frac: f64,
    pub vmin: usize,
    pub vmax: usize,
    pub compact_min: f64,
    pub dedup_iou: f64,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            min_area: 500.0,
            min_perimeter: 50.0,
            epsilon_frac: 0.01,
            vmin: 3,
            vmax: 50,
            compact_min: 0.01,
            dedup_iou: 0.5,
        }
    }
}

pub const DEFAULT_DPI: f64 = 300.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let c = DetectConfig::default();
        assert_eq!(c.min_area, 500.0);
        assert_eq!(c.min_perimeter, 50.0);
        assert_eq!(c.vmin, 3);
        assert_eq!(c.vmax, 50);
        assert_eq!(c.dedup_iou, 0.5);
    }

    #[test]
    fn round_trips_through_json() {
        let c = DetectConfig::default();
        let s = serde_json::to_string(&c).unwrap();
        let back: DetectConfig = serde_json::from_str(&s).unwrap();
        assert_eq!(c, back);
    }
}
