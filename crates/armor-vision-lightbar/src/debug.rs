//! Optional annotation target for the detection stages.
//!
//! The caller owns the canvas and passes `Some(&mut canvas)` into the stages
//! it wants drawn; passing `None` skips all drawing.

use armor_vision_core::{PixelOffset, RotatedRect};
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use nalgebra::Point2;

use crate::{MarkerCandidate, Shape};

pub const OUTLINE_COLOR: Rgb<u8> = Rgb([47, 255, 173]);
pub const RECTANGLE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const ELLIPSE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);
pub const LOCK_COLOR: Rgb<u8> = Rgb([255, 0, 255]);

/// Full-frame RGB image that stages draw on.
///
/// Stages work in crop coordinates; `set_offset` shifts their drawings to
/// the crop origin.
#[derive(Clone, Debug)]
pub struct DebugCanvas {
    image: RgbImage,
    offset: PixelOffset,
    annotations: usize,
}

impl DebugCanvas {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            offset: PixelOffset::ZERO,
            annotations: 0,
        }
    }

    /// Canvas showing a binary mask in gray.
    pub fn from_mask(mask: &GrayImage) -> Self {
        let image = RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
            let v = mask.get_pixel(x, y)[0] / 2;
            Rgb([v, v, v])
        });
        Self::new(image)
    }

    pub fn set_offset(&mut self, offset: PixelOffset) {
        self.offset = offset;
    }

    pub fn offset(&self) -> PixelOffset {
        self.offset
    }

    /// Number of primitives drawn so far.
    pub fn annotations(&self) -> usize {
        self.annotations
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn into_image(self) -> RgbImage {
        self.image
    }

    fn shift(&self, p: Point2<f32>) -> (f32, f32) {
        (p.x + self.offset.x as f32, p.y + self.offset.y as f32)
    }

    pub fn draw_rotated_rect(&mut self, rect: &RotatedRect, color: Rgb<u8>) {
        let corners = rect.corners();
        for i in 0..4 {
            let a = self.shift(corners[i]);
            let b = self.shift(corners[(i + 1) % 4]);
            draw_line_segment_mut(&mut self.image, a, b, color);
        }
        self.annotations += 1;
    }

    pub fn draw_dot(&mut self, center: Point2<f32>, radius: i32, color: Rgb<u8>) {
        let (x, y) = self.shift(center);
        draw_filled_circle_mut(
            &mut self.image,
            (x.round() as i32, y.round() as i32),
            radius,
            color,
        );
        self.annotations += 1;
    }

    /// Outline plus a center dot colored by shape.
    pub fn draw_marker(&mut self, marker: &MarkerCandidate) {
        self.draw_rotated_rect(&marker.feature.circumscribed, OUTLINE_COLOR);
        let color = match marker.shape() {
            Shape::Rectangle => RECTANGLE_COLOR,
            Shape::Ellipse => ELLIPSE_COLOR,
        };
        self.draw_dot(marker.feature.center, 3, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_moves_drawings_into_frame_coordinates() {
        let mut canvas = DebugCanvas::new(RgbImage::new(100, 100));
        canvas.set_offset(PixelOffset::new(40, 30));
        canvas.draw_dot(Point2::new(5.0, 5.0), 1, LOCK_COLOR);
        assert_eq!(*canvas.image().get_pixel(45, 35), LOCK_COLOR);
        assert_eq!(*canvas.image().get_pixel(5, 5), Rgb([0, 0, 0]));
        assert_eq!(canvas.annotations(), 1);
    }

    #[test]
    fn mask_canvas_is_dimmed_gray() {
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 1, image::Luma([255]));
        let canvas = DebugCanvas::from_mask(&mask);
        assert_eq!(*canvas.image().get_pixel(1, 1), Rgb([127, 127, 127]));
    }
}
