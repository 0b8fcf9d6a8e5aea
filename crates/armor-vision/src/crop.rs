use armor_vision_core::{PixelOffset, PixelRect};
use image::RgbImage;

/// Crop of a frame plus the position of its origin in the frame.
#[derive(Clone, Debug)]
pub struct CroppedFrame {
    pub image: RgbImage,
    pub offset: PixelOffset,
}

/// Cut `roi` out of `image`, clamped to the frame.
///
/// `None`, or a region with nothing left after clamping, yields the whole
/// frame at offset `(0, 0)`.
pub fn crop_to_region(image: &RgbImage, roi: Option<PixelRect>) -> CroppedFrame {
    let region = roi.and_then(|r| r.clamp_to(image.width(), image.height()));
    match region {
        Some(r) => CroppedFrame {
            image: image::imageops::crop_imm(
                image,
                r.x as u32,
                r.y as u32,
                r.width as u32,
                r.height as u32,
            )
            .to_image(),
            offset: r.origin(),
        },
        None => CroppedFrame {
            image: image.clone(),
            offset: PixelOffset::ZERO,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn frame() -> RgbImage {
        RgbImage::from_fn(100, 80, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn no_roi_returns_full_frame() {
        let cropped = crop_to_region(&frame(), None);
        assert_eq!(cropped.image.dimensions(), (100, 80));
        assert_eq!(cropped.offset, PixelOffset::ZERO);
    }

    #[test]
    fn roi_is_clamped_to_frame() {
        let cropped = crop_to_region(&frame(), Some(PixelRect::new(-10, 60, 30, 40)));
        assert_eq!(cropped.offset, PixelOffset::new(0, 60));
        assert_eq!(cropped.image.dimensions(), (20, 20));
        assert_eq!(*cropped.image.get_pixel(5, 3), Rgb([5, 63, 0]));
    }

    #[test]
    fn roi_outside_frame_falls_back_to_full_frame() {
        let cropped = crop_to_region(&frame(), Some(PixelRect::new(200, 200, 10, 10)));
        assert_eq!(cropped.image.dimensions(), (100, 80));
        assert_eq!(cropped.offset, PixelOffset::ZERO);
    }
}
