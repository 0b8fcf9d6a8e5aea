use std::collections::HashMap;

use armor_vision_core::{
    is_geometry_feature_identical, GeometryFeature, IDENTICAL_CENTER_TOLERANCE_PX,
};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Width of one bucket over the magnitude of a pair's center sum.
///
/// Equivalent pairs have center sums at most two center tolerances apart,
/// so their keys differ by at most one.
pub const PAIR_BUCKET_WIDTH: f32 = 2.0 * IDENTICAL_CENTER_TOLERANCE_PX;

/// Unordered pair of markers; `(a, b)` and `(b, a)` are the same candidate.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ElementPair {
    pub first: GeometryFeature,
    pub second: GeometryFeature,
}

impl ElementPair {
    pub fn new(first: GeometryFeature, second: GeometryFeature) -> Self {
        Self { first, second }
    }

    /// Sum of both centers as a vector; independent of member order.
    #[inline]
    pub fn center_sum(&self) -> Vector2<f32> {
        self.first.center.coords + self.second.center.coords
    }

    /// Whether both pairs describe the same plate, in either member order.
    pub fn is_equivalent(&self, other: &ElementPair) -> bool {
        (is_geometry_feature_identical(&self.first, &other.first)
            && is_geometry_feature_identical(&self.second, &other.second))
            || (is_geometry_feature_identical(&self.first, &other.second)
                && is_geometry_feature_identical(&self.second, &other.first))
    }

    fn bucket_key(&self) -> i64 {
        (self.center_sum().norm() / PAIR_BUCKET_WIDTH).floor() as i64
    }
}

/// Per-frame set of pairs deduplicated by [`ElementPair::is_equivalent`].
///
/// Iteration follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct ElementPairSet {
    pairs: Vec<ElementPair>,
    buckets: HashMap<i64, Vec<usize>>,
}

impl ElementPairSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `pair` unless an equivalent pair is present; returns whether it was added.
    pub fn insert(&mut self, pair: ElementPair) -> bool {
        if self.find(&pair).is_some() {
            return false;
        }
        let idx = self.pairs.len();
        self.pairs.push(pair);
        self.buckets.entry(pair.bucket_key()).or_default().push(idx);
        true
    }

    /// Stored pair equivalent to `pair`, if any.
    pub fn find(&self, pair: &ElementPair) -> Option<&ElementPair> {
        let key = pair.bucket_key();
        (key - 1..=key + 1)
            .filter_map(|k| self.buckets.get(&k))
            .flatten()
            .map(|&i| &self.pairs[i])
            .find(|stored| stored.is_equivalent(pair))
    }

    pub fn contains(&self, pair: &ElementPair) -> bool {
        self.find(pair).is_some()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ElementPair> {
        self.pairs.iter()
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
        self.buckets.clear();
    }
}

impl<'a> IntoIterator for &'a ElementPairSet {
    type Item = &'a ElementPair;
    type IntoIter = std::slice::Iter<'a, ElementPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ElementPair> for ElementPairSet {
    fn from_iter<I: IntoIterator<Item = ElementPair>>(iter: I) -> Self {
        let mut set = Self::new();
        for pair in iter {
            set.insert(pair);
        }
        set
    }
}

impl Extend<ElementPair> for ElementPairSet {
    fn extend<I: IntoIterator<Item = ElementPair>>(&mut self, iter: I) {
        for pair in iter {
            self.insert(pair);
        }
    }
}
