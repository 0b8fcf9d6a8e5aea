//! High-level facade crate for the `armor-vision-*` workspace.
//!
//! This crate provides:
//! - re-exports of the stage crates (geometry, light bar search, armor
//!   matching, tracking)
//! - the region cropper and color mask boundary stages
//! - [`ArmorPipeline`], which threads one frame through every stage and
//!   feeds the tracker's region of interest back into the next crop
//! - JSON configuration ([`PipelineConfig`])
//!
//! ## Quickstart
//!
//! ```no_run
//! use armor_vision::{ArmorPipeline, PipelineConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::load_json("armor.json")?;
//! let mut pipeline = ArmorPipeline::from_config(&config)?;
//! let frame = image::open("frame.png")?.to_rgb8();
//! let report = pipeline.process_frame(&frame, None)?;
//! println!("{:?} at ({}, {})", report.decision.command, report.decision.x, report.decision.y);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `armor_vision::core`: rotated rectangles, polygon and ellipse fitting, features.
//! - `armor_vision::lightbar`: contour classification into light bar markers.
//! - `armor_vision::matching`: marker pairs and the deduplicating pair set.
//! - `armor_vision::tracking`: the search/track state machine.

pub use armor_vision_core as core;
pub use armor_vision_lightbar as lightbar;
pub use armor_vision_matching as matching;
pub use armor_vision_tracking as tracking;

mod color_mask;
mod crop;
mod io;
mod pipeline;

pub use color_mask::{ChannelDifferenceMask, ColorMask, TargetColor};
pub use crop::{crop_to_region, CroppedFrame};
pub use io::{ConfigError, PipelineConfig};
pub use pipeline::{load_frame, ArmorPipeline, FrameReport, PipelineError};

pub use armor_vision_core::{PixelOffset, PixelRect};
pub use armor_vision_lightbar::DebugCanvas;
pub use armor_vision_tracking::{Command, TargetDecision};
