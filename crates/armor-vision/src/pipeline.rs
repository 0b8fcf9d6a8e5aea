//! One-frame orchestration: crop, mask, search, pair, track.

use std::path::Path;
use std::sync::Arc;

use armor_vision_core::{PixelOffset, PixelRect};
use armor_vision_lightbar::{
    DebugCanvas, LightBarSearchParams, LightBarSearcher, LOCK_COLOR, OUTLINE_COLOR,
};
use armor_vision_matching::{cast_pair_to_rotated_rect, ArmorMatchParams, ArmorMatcher};
use armor_vision_tracking::{ArmorTracker, Command, TargetDecision, TrackerParams};
use image::{GrayImage, RgbImage};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{crop_to_region, ChannelDifferenceMask, ColorMask, ConfigError, PipelineConfig};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("color mask is {mask_width}x{mask_height} but the crop is {crop_width}x{crop_height}")]
    MaskSizeMismatch {
        mask_width: u32,
        mask_height: u32,
        crop_width: u32,
        crop_height: u32,
    },
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Decode an image file into an RGB frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<RgbImage, PipelineError> {
    Ok(image::open(path)?.to_rgb8())
}

/// Stage counts and the decision for one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameReport {
    /// Zero-based count of frames processed since construction or reset.
    pub frame: u64,
    /// Crop origin used for this frame.
    pub offset: PixelOffset,
    pub contours: usize,
    pub rectangles: usize,
    pub ellipses: usize,
    pub pairs: usize,
    pub decision: TargetDecision,
}

/// Owns the stages and the region of interest carried between frames.
pub struct ArmorPipeline<M = ChannelDifferenceMask> {
    color_mask: M,
    searcher: LightBarSearcher,
    matcher: ArmorMatcher,
    tracker: ArmorTracker,
    pending_roi: Option<PixelRect>,
    frames: u64,
}

impl ArmorPipeline<ChannelDifferenceMask> {
    /// Build the pipeline described by `config`, including its worker pool.
    pub fn from_config(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let mut pipeline = Self::new(
            config.color_mask.clone(),
            config.light_bar.clone(),
            config.matching.clone(),
            config.tracker.clone(),
        );
        if let Some(threads) = config.worker_threads {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?;
            pipeline.searcher = pipeline.searcher.with_thread_pool(Arc::new(pool));
        }
        Ok(pipeline)
    }

    /// Load a JSON config from disk and build the pipeline it describes.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let config = PipelineConfig::load_json(path)?;
        Self::from_config(&config)
    }
}

impl<M: ColorMask> ArmorPipeline<M> {
    pub fn new(
        color_mask: M,
        light_bar: LightBarSearchParams,
        matching: ArmorMatchParams,
        tracker: TrackerParams,
    ) -> Self {
        Self {
            color_mask,
            searcher: LightBarSearcher::new(light_bar),
            matcher: ArmorMatcher::new(matching),
            tracker: ArmorTracker::new(tracker),
            pending_roi: None,
            frames: 0,
        }
    }

    /// Region the next frame will be cropped to; `None` is the full frame.
    #[inline]
    pub fn pending_roi(&self) -> Option<PixelRect> {
        self.pending_roi
    }

    #[inline]
    pub fn tracker(&self) -> &ArmorTracker {
        &self.tracker
    }

    /// Drop the lock, the search candidates and the pending region.
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.pending_roi = None;
        self.frames = 0;
    }

    /// Run a full RGB frame through every stage.
    ///
    /// `debug`, when given, must be a canvas of the full frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(frame = self.frames))
    )]
    pub fn process_frame(
        &mut self,
        frame: &RgbImage,
        debug: Option<&mut DebugCanvas>,
    ) -> Result<FrameReport, PipelineError> {
        let cropped = crop_to_region(frame, self.pending_roi);
        let mask = self.color_mask.apply(&cropped.image);
        if mask.dimensions() != cropped.image.dimensions() {
            return Err(PipelineError::MaskSizeMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                crop_width: cropped.image.width(),
                crop_height: cropped.image.height(),
            });
        }
        Ok(self.process_mask(&mask, cropped.offset, debug))
    }

    /// Run an already binarized crop whose origin sits at `offset` in the frame.
    pub fn process_mask(
        &mut self,
        mask: &GrayImage,
        offset: PixelOffset,
        mut debug: Option<&mut DebugCanvas>,
    ) -> FrameReport {
        if let Some(canvas) = debug.as_deref_mut() {
            canvas.set_offset(offset);
        }
        let markers = self.searcher.search(mask, debug.as_deref_mut());
        let pairs = self.matcher.match_markers(&markers);
        let decision = self.tracker.update(&pairs, offset);

        if let Some(canvas) = debug {
            for pair in &pairs {
                canvas.draw_rotated_rect(&cast_pair_to_rotated_rect(pair), OUTLINE_COLOR);
            }
            canvas.set_offset(PixelOffset::ZERO);
            if decision.command != Command::Standby {
                canvas.draw_dot(Point2::new(decision.x as f32, decision.y as f32), 5, LOCK_COLOR);
            }
        }

        self.pending_roi = decision.roi;
        let report = FrameReport {
            frame: self.frames,
            offset,
            contours: markers.contours,
            rectangles: markers.rectangles.len(),
            ellipses: markers.ellipses.len(),
            pairs: pairs.len(),
            decision,
        };
        self.frames += 1;

        log::debug!(
            "frame {}: {} markers, {} pairs -> {:?}",
            report.frame,
            markers.len(),
            report.pairs,
            decision.command
        );
        report
    }
}
