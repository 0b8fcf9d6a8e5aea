//! Light bar search: find marker candidates in a binary color mask.
//!
//! Every external contour of the mask is classified independently (and in
//! parallel) as an ellipse-shaped or rectangle-shaped light bar by comparing
//! its pixel area with the area of the fitted shape. Contours that fill
//! neither shape well enough are dropped as noise.
//!
//! ```
//! use armor_vision_lightbar::{LightBarSearchParams, LightBarSearcher};
//!
//! let mask = image::GrayImage::new(64, 48);
//! let searcher = LightBarSearcher::new(LightBarSearchParams::default());
//! let found = searcher.search(&mask, None);
//! assert!(found.is_empty());
//! ```

mod classify;
mod contours;
mod debug;
mod params;
mod search;

pub use classify::{classify_contour, MarkerCandidate, INSCRIBED_ELLIPSE_AREA_RATIO};
pub use contours::external_contours;
pub use debug::{DebugCanvas, ELLIPSE_COLOR, LOCK_COLOR, OUTLINE_COLOR, RECTANGLE_COLOR};
pub use params::LightBarSearchParams;
pub use search::{LightBarSearchResult, LightBarSearcher};

pub use armor_vision_core::{GeometryFeature, Shape};
