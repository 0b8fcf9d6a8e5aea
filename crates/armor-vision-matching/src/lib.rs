//! Armor matching: pair light bar markers into armor plate candidates.
//!
//! Two markers that look like the left and right light bars of one plate
//! (similar length, near-parallel, side by side at a plausible distance)
//! form an [`ElementPair`]. Pairs are collected into an [`ElementPairSet`]
//! that collapses pairs describing the same physical plate.

mod matcher;
mod pair;
mod params;

pub use matcher::{cast_pair_to_rotated_rect, ArmorMatcher};
pub use pair::{ElementPair, ElementPairSet, PAIR_BUCKET_WIDTH};
pub use params::ArmorMatchParams;
