use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;

/// Outer borders of all top-level foreground blobs (non-zero pixels).
///
/// Holes and blobs nested inside holes are skipped. Points are pixel
/// centers in mask coordinates, in tracing order.
pub fn external_contours(mask: &GrayImage) -> Vec<Vec<Point2<f32>>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            c.points
                .into_iter()
                .map(|p| Point2::new(p.x as f32, p.y as f32))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn fill(mask: &mut GrayImage, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }

    #[test]
    fn empty_mask_has_no_contours() {
        assert!(external_contours(&GrayImage::new(32, 32)).is_empty());
    }

    #[test]
    fn ring_yields_only_its_outer_border() {
        let mut mask = GrayImage::new(40, 40);
        fill(&mut mask, 5, 5, 30, 30);
        for y in 12..28 {
            for x in 12..28 {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
        // Island inside the hole.
        fill(&mut mask, 18, 18, 4, 4);

        let contours = external_contours(&mask);
        assert_eq!(contours.len(), 1);
        let xs = contours[0].iter().map(|p| p.x);
        let max_x = xs.fold(f32::MIN, f32::max);
        assert_eq!(max_x, 34.0);
    }

    #[test]
    fn separate_blobs_give_separate_contours() {
        let mut mask = GrayImage::new(60, 30);
        fill(&mut mask, 2, 2, 6, 20);
        fill(&mut mask, 30, 2, 6, 20);
        assert_eq!(external_contours(&mask).len(), 2);
    }
}
