use serde::{Deserialize, Serialize};

/// Tracking window, lock and region-of-interest settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Frames a search candidate survives without being seen again.
    pub tracking_frames: u32,
    /// Sightings needed before a candidate becomes the lock.
    pub appearance_threshold: u32,
    /// ROI scale around a freshly seen lock.
    pub roi_first_scale: f32,
    /// ROI scale while the lock is missing.
    pub roi_lost_scale: f32,
    /// Intersection over union must exceed this for two plates to match.
    pub intersection_area_ratio_threshold: f32,
    /// Axis difference over 90 degrees must not exceed this.
    pub angle_ratio_threshold: f32,
    /// Consecutive misses tolerated in `Track` before returning to `Search`.
    pub lost_grace_frames: u32,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            tracking_frames: 5,
            appearance_threshold: 3,
            roi_first_scale: 2.0,
            roi_lost_scale: 3.0,
            intersection_area_ratio_threshold: 0.5,
            angle_ratio_threshold: 0.5,
            lost_grace_frames: 5,
        }
    }
}
