//! Detector (spec.md §4.3): runs ColorSegmenter + PolygonExtractor for both
//! annotation kinds, merges and deduplicates. Never fails.

use crate::color::{threshold_hsv_windows, FILLED_WINDOWS, THICK_WINDOWS};
use crate::config::DetectConfig;
use crate::dedup::dedup;
use crate::extractor::extract_polygons;
use crate::morphology::{close3x3, dilate3x3, open3x3};
use crate::types::{DetectedPolygon, DetectionKind, Raster};

/// Runs color segmentation for the thick-outline window, including the
/// CLOSE → OPEN → DILATE morphology pipeline spec.md §4.1 prescribes.
pub fn segment_thick(raster: &Raster) -> crate::buffer::Mask {
    let m = threshold_hsv_windows(raster, &THICK_WINDOWS);
    let m = close3x3(&m);
    let m = open3x3(&m);
    dilate3x3(&m)
}

/// Runs color segmentation for the pale-fill window: CLOSE → OPEN, no
/// dilation (dilating would merge adjacent filled regions, per spec.md §4.1).
pub fn segment_filled(raster: &Raster) -> crate::buffer::Mask {
    let m = threshold_hsv_windows(raster, &FILLED_WINDOWS);
    let m = close3x3(&m);
    open3x3(&m)
}

/// Detects red annotations in `raster` and returns georeference-ready
/// pixel-space polygons. Never fails: an all-white or all-black raster
/// yields an empty `Vec`.
pub fn detect(raster: &Raster, config: &DetectConfig) -> Vec<DetectedPolygon> {
    let mut next_id = {
        let mut counter = 0u64;
        move || {
            counter += 1;
            counter
        }
    };

    let mask_thick = segment_thick(raster);
    let mask_filled = segment_filled(raster);

    let mut candidates = extract_polygons(&mask_thick, DetectionKind::ThickBorder, config, &mut next_id);
    candidates.extend(extract_polygons(&mask_filled, DetectionKind::FilledArea, config, &mut next_id));

    if candidates.is_empty() {
        log::debug!("detect: no candidate polygons survived extraction");
        return candidates;
    }

    let kept = dedup(candidates, config.dedup_iou);
    log::debug!("detect: {} polygon(s) survived dedup", kept.len());
    kept
}
