use std::sync::Arc;

use image::GrayImage;
use nalgebra::Point2;
use rayon::prelude::*;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::classify::classify_contour;
use crate::contours::external_contours;
use crate::{DebugCanvas, LightBarSearchParams, MarkerCandidate, Shape};

/// Light bars of one frame, split by shape, in contour order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LightBarSearchResult {
    pub rectangles: Vec<MarkerCandidate>,
    pub ellipses: Vec<MarkerCandidate>,
    /// External contours examined, accepted or not.
    pub contours: usize,
}

impl LightBarSearchResult {
    pub fn len(&self) -> usize {
        self.rectangles.len() + self.ellipses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rectangles.is_empty() && self.ellipses.is_empty()
    }

    /// Both collections, rectangles first.
    pub fn iter(&self) -> impl Iterator<Item = &MarkerCandidate> {
        self.rectangles.iter().chain(self.ellipses.iter())
    }
}

/// Classifies mask contours into light bar candidates.
pub struct LightBarSearcher {
    params: LightBarSearchParams,
    pool: Option<Arc<ThreadPool>>,
}

impl LightBarSearcher {
    pub fn new(params: LightBarSearchParams) -> Self {
        Self { params, pool: None }
    }

    /// Run the per-contour fan-out on `pool` instead of the global rayon pool.
    pub fn with_thread_pool(mut self, pool: Arc<ThreadPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    #[inline]
    pub fn params(&self) -> &LightBarSearchParams {
        &self.params
    }

    /// Find light bars in a binary mask.
    ///
    /// Contours are classified in parallel; each task returns its own
    /// optional result and the two shape collections are filled after the
    /// join. When `debug` is given, accepted markers are drawn on it.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(width = mask.width(), height = mask.height()))
    )]
    pub fn search(
        &self,
        mask: &GrayImage,
        debug: Option<&mut DebugCanvas>,
    ) -> LightBarSearchResult {
        let contours = external_contours(mask);
        let result = self.search_contours(&contours);

        if let Some(canvas) = debug {
            for marker in result.iter() {
                canvas.draw_marker(marker);
            }
        }

        log::debug!(
            "light bars: {} rectangles, {} ellipses out of {} contours",
            result.rectangles.len(),
            result.ellipses.len(),
            result.contours
        );
        result
    }

    /// Classify already extracted contours.
    pub fn search_contours(&self, contours: &[Vec<Point2<f32>>]) -> LightBarSearchResult {
        let classified = match &self.pool {
            Some(pool) => pool.install(|| classify_all(contours, &self.params)),
            None => classify_all(contours, &self.params),
        };

        let (rectangles, ellipses): (Vec<_>, Vec<_>) = classified
            .into_iter()
            .partition(|m| m.shape() == Shape::Rectangle);

        LightBarSearchResult {
            rectangles,
            ellipses,
            contours: contours.len(),
        }
    }
}

fn classify_all(
    contours: &[Vec<Point2<f32>>],
    params: &LightBarSearchParams,
) -> Vec<MarkerCandidate> {
    contours
        .par_iter()
        .filter_map(|contour| classify_contour(contour, params))
        .collect()
}
