//! Temporal tracking of armor plate candidates.
//!
//! [`ArmorTracker`] consumes one [`armor_vision_matching::ElementPairSet`]
//! per frame. In `Search` it counts how often each plate shows up within a
//! sliding window of frames and locks onto the first one seen often enough.
//! In `Track` it follows the locked plate, tolerating a few missed frames
//! before falling back to `Search`. Every frame yields a [`TargetDecision`]
//! with a region of interest for the next crop.

mod decision;
mod params;
mod tracker;

pub use decision::{Command, TargetDecision};
pub use params::TrackerParams;
pub use tracker::{is_same_armor, ArmorTracker, Candidate, CandidateStatus, TrackingState};
