use armor_vision_core::{
    axis_angle_difference, intersection_over_union, PixelOffset, PixelRect, RotatedRect,
};
use armor_vision_matching::{cast_pair_to_rotated_rect, ElementPairSet};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Command, TargetDecision, TrackerParams};

/// Sighting statistics of one search candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateStatus {
    pub appearances: u32,
    pub remaining_frames: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Latest sighting, full-frame coordinates.
    pub rect: RotatedRect,
    pub status: CandidateStatus,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum TrackingState {
    /// Candidates in insertion order.
    Search { candidates: Vec<Candidate> },
    /// `missed` counts consecutive frames without the lock.
    Track { lock: RotatedRect, missed: u32 },
}

impl Default for TrackingState {
    fn default() -> Self {
        TrackingState::Search {
            candidates: Vec::new(),
        }
    }
}

/// Whether `current` is a later sighting of the plate seen as `previous`.
///
/// Requires intersection over union strictly above the threshold and an
/// axis difference, as a fraction of 90 degrees, within the angle ratio.
pub fn is_same_armor(
    current: &RotatedRect,
    previous: &RotatedRect,
    params: &TrackerParams,
) -> bool {
    overlap_if_same(current, previous, params).is_some()
}

fn overlap_if_same(
    current: &RotatedRect,
    previous: &RotatedRect,
    params: &TrackerParams,
) -> Option<f32> {
    let angle_ratio = axis_angle_difference(current.angle, previous.angle) / 90.0;
    if angle_ratio > params.angle_ratio_threshold {
        return None;
    }
    let iou = intersection_over_union(current, previous);
    (iou > params.intersection_area_ratio_threshold).then_some(iou)
}

/// Search/track state machine over per-frame armor pairs.
#[derive(Clone, Debug, Default)]
pub struct ArmorTracker {
    params: TrackerParams,
    state: TrackingState,
}

impl ArmorTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            state: TrackingState::default(),
        }
    }

    #[inline]
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    #[inline]
    pub fn state(&self) -> &TrackingState {
        &self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, TrackingState::Track { .. })
    }

    /// Back to `Search` with no candidates.
    pub fn reset(&mut self) {
        self.state = TrackingState::default();
    }

    /// Advance one frame. `offset` is the crop origin the pairs were found in.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(pairs = pairs.len()))
    )]
    pub fn update(&mut self, pairs: &ElementPairSet, offset: PixelOffset) -> TargetDecision {
        let observations: Vec<RotatedRect> = pairs
            .iter()
            .map(|pair| {
                cast_pair_to_rotated_rect(pair).translated(offset.x as f32, offset.y as f32)
            })
            .collect();
        self.update_with_observations(&observations)
    }

    /// Advance one frame with plate rectangles already in full-frame coordinates.
    pub fn update_with_observations(&mut self, observations: &[RotatedRect]) -> TargetDecision {
        match std::mem::take(&mut self.state) {
            TrackingState::Search { candidates } => self.search(candidates, observations),
            TrackingState::Track { lock, missed } => self.track(lock, missed, observations),
        }
    }

    fn search(
        &mut self,
        mut candidates: Vec<Candidate>,
        observations: &[RotatedRect],
    ) -> TargetDecision {
        let params = &self.params;
        let mut refreshed = vec![false; candidates.len()];

        for obs in observations {
            match candidates
                .iter()
                .position(|c| is_same_armor(obs, &c.rect, params))
            {
                Some(i) => {
                    if refreshed[i] {
                        continue;
                    }
                    refreshed[i] = true;
                    let candidate = &mut candidates[i];
                    candidate.rect = *obs;
                    candidate.status.appearances += 1;
                    candidate.status.remaining_frames = params.tracking_frames;
                }
                None => {
                    candidates.push(Candidate {
                        rect: *obs,
                        status: CandidateStatus {
                            appearances: 1,
                            remaining_frames: params.tracking_frames,
                        },
                    });
                    refreshed.push(true);
                }
            }
        }

        for (candidate, seen) in candidates.iter_mut().zip(&refreshed) {
            if !seen {
                candidate.status.remaining_frames =
                    candidate.status.remaining_frames.saturating_sub(1);
            }
        }
        candidates.retain(|c| c.status.remaining_frames > 0);

        let mut best: Option<&Candidate> = None;
        for c in &candidates {
            if c.status.appearances >= params.appearance_threshold
                && best.is_none_or(|b| c.status.appearances > b.status.appearances)
            {
                best = Some(c);
            }
        }

        match best.map(|c| c.rect) {
            Some(lock) => {
                log::info!(
                    "target locked at ({:.1}, {:.1}) after {} candidates",
                    lock.center.x,
                    lock.center.y,
                    candidates.len()
                );
                self.state = TrackingState::Track { lock, missed: 0 };
                self.aim(Command::Track, &lock, params.roi_first_scale)
            }
            None => {
                log::trace!("searching: {} candidates", candidates.len());
                self.state = TrackingState::Search { candidates };
                TargetDecision::standby()
            }
        }
    }

    fn track(
        &mut self,
        lock: RotatedRect,
        missed: u32,
        observations: &[RotatedRect],
    ) -> TargetDecision {
        let params = &self.params;
        let mut best: Option<(f32, RotatedRect)> = None;
        for obs in observations {
            if let Some(iou) = overlap_if_same(obs, &lock, params) {
                if best.is_none_or(|(best_iou, _)| iou > best_iou) {
                    best = Some((iou, *obs));
                }
            }
        }

        if let Some((_, lock)) = best {
            self.state = TrackingState::Track { lock, missed: 0 };
            return self.aim(Command::Fire, &lock, params.roi_first_scale);
        }

        let missed = missed + 1;
        if missed <= params.lost_grace_frames {
            log::debug!("target missing for {missed} frame(s)");
            self.state = TrackingState::Track { lock, missed };
            self.aim(Command::Track, &lock, params.roi_lost_scale)
        } else {
            log::info!("target lost after {missed} missed frames");
            self.state = TrackingState::default();
            TargetDecision::standby()
        }
    }

    fn aim(&self, command: Command, lock: &RotatedRect, roi_scale: f32) -> TargetDecision {
        TargetDecision {
            command,
            x: lock.center.x.round() as i32,
            y: lock.center.y.round() as i32,
            identifier: 0,
            roi: Some(PixelRect::bounding(lock).scaled(roi_scale)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point2;

    fn plate(x: f32, y: f32) -> RotatedRect {
        RotatedRect::new(Point2::new(x, y), 60.0, 30.0, 0.0)
    }

    fn acquire(tracker: &mut ArmorTracker, rect: RotatedRect) -> TargetDecision {
        let mut last = TargetDecision::standby();
        for _ in 0..tracker.params().appearance_threshold {
            last = tracker.update_with_observations(&[rect]);
        }
        last
    }

    #[test]
    fn empty_frames_keep_standby() {
        let mut tracker = ArmorTracker::default();
        for _ in 0..10 {
            assert_eq!(tracker.update_with_observations(&[]), TargetDecision::standby());
        }
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn locks_after_three_sightings_within_window() {
        let mut tracker = ArmorTracker::default();
        let rect = plate(200.0, 150.0);
        let frames = [true, false, true, false, true];
        let decisions: Vec<_> = frames
            .iter()
            .map(|&seen| {
                let obs = if seen { vec![rect] } else { vec![] };
                tracker.update_with_observations(&obs)
            })
            .collect();

        for d in &decisions[..4] {
            assert_eq!(d.command, Command::Standby);
            assert_eq!(d.roi, None);
        }
        let locked = decisions[4];
        assert_eq!(locked.command, Command::Track);
        assert_eq!((locked.x, locked.y), (200, 150));
        assert_eq!(locked.roi, Some(PixelRect::bounding(&rect).scaled(2.0)));
        assert!(matches!(tracker.state(), TrackingState::Track { missed: 0, .. }));
    }

    #[test]
    fn candidate_expires_after_window() {
        let mut tracker = ArmorTracker::default();
        let rect = plate(200.0, 150.0);
        tracker.update_with_observations(&[rect]);
        for _ in 0..4 {
            tracker.update_with_observations(&[]);
        }
        match tracker.state() {
            TrackingState::Search { candidates } => {
                assert_eq!(candidates.len(), 1);
                assert_eq!(candidates[0].status.remaining_frames, 1);
            }
            other => panic!("unexpected state {other:?}"),
        }
        tracker.update_with_observations(&[]);
        assert_eq!(tracker.state(), &TrackingState::default());
    }

    #[test]
    fn duplicate_sightings_count_once_per_frame() {
        let mut tracker = ArmorTracker::default();
        let a = plate(200.0, 150.0);
        let b = plate(201.0, 150.0);
        tracker.update_with_observations(&[a, b]);
        tracker.update_with_observations(&[a, b]);
        match tracker.state() {
            TrackingState::Search { candidates } => {
                assert_eq!(candidates.len(), 1);
                assert_eq!(candidates[0].status.appearances, 2);
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn highest_count_wins_then_earliest() {
        let mut tracker = ArmorTracker::default();
        let a = plate(100.0, 100.0);
        let b = plate(400.0, 100.0);
        let c = plate(700.0, 100.0);
        tracker.update_with_observations(&[b]);
        tracker.update_with_observations(&[a, b, c]);
        let d = tracker.update_with_observations(&[a, b, c]);
        // b has three sightings, a and c two each.
        assert_eq!((d.x, d.y), (400, 100));

        let mut tracker = ArmorTracker::default();
        for _ in 0..3 {
            tracker.update_with_observations(&[a, c]);
        }
        let TrackingState::Track { lock, .. } = tracker.state() else {
            panic!("expected a lock");
        };
        assert_eq!(lock.center, a.center);
    }

    #[test]
    fn followed_lock_fires_and_best_overlap_wins() {
        let mut tracker = ArmorTracker::default();
        acquire(&mut tracker, plate(200.0, 150.0));

        let near = plate(204.0, 150.0);
        let farther = plate(215.0, 150.0);
        let d = tracker.update_with_observations(&[farther, near]);
        assert_eq!(d.command, Command::Fire);
        assert_eq!((d.x, d.y), (204, 150));
        assert_eq!(d.identifier, 0);
        assert_eq!(d.roi, Some(PixelRect::bounding(&near).scaled(2.0)));
    }

    #[test]
    fn lost_lock_widens_roi_then_returns_to_search() {
        let mut tracker = ArmorTracker::default();
        let rect = plate(200.0, 150.0);
        acquire(&mut tracker, rect);

        for miss in 1..=5 {
            let d = tracker.update_with_observations(&[]);
            assert_eq!(d.command, Command::Track, "miss {miss}");
            assert_eq!((d.x, d.y), (200, 150));
            assert_eq!(d.roi, Some(PixelRect::bounding(&rect).scaled(3.0)));
        }
        let d = tracker.update_with_observations(&[]);
        assert_eq!(d, TargetDecision::standby());
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn reacquired_lock_resets_misses() {
        let mut tracker = ArmorTracker::default();
        let rect = plate(200.0, 150.0);
        acquire(&mut tracker, rect);
        for _ in 0..4 {
            tracker.update_with_observations(&[]);
        }
        assert_eq!(tracker.update_with_observations(&[rect]).command, Command::Fire);
        for _ in 0..5 {
            assert_eq!(tracker.update_with_observations(&[]).command, Command::Track);
        }
    }

    #[test]
    fn overlap_threshold_is_strict() {
        let params = TrackerParams::default();
        let outer = RotatedRect::new(Point2::new(50.0, 50.0), 10.0, 10.0, 0.0);
        let half = RotatedRect::new(Point2::new(50.0, 50.0), 10.0, 5.0, 0.0);
        let more = RotatedRect::new(Point2::new(50.0, 50.0), 10.0, 5.1, 0.0);
        assert!(!is_same_armor(&half, &outer, &params));
        assert!(is_same_armor(&more, &outer, &params));
    }

    #[test]
    fn angle_ratio_limits_rotation() {
        let params = TrackerParams {
            intersection_area_ratio_threshold: 0.0,
            ..TrackerParams::default()
        };
        let a = RotatedRect::new(Point2::new(50.0, 50.0), 40.0, 20.0, 10.0);
        let b = RotatedRect::new(Point2::new(50.0, 50.0), 40.0, 20.0, 50.0);
        let c = RotatedRect::new(Point2::new(50.0, 50.0), 40.0, 20.0, 60.0);
        assert!(is_same_armor(&b, &a, &params));
        assert!(!is_same_armor(&c, &a, &params));
    }

    #[test]
    fn reset_drops_lock() {
        let mut tracker = ArmorTracker::default();
        acquire(&mut tracker, plate(200.0, 150.0));
        assert!(tracker.is_tracking());
        tracker.reset();
        assert_eq!(tracker.state(), &TrackingState::default());
    }
}
