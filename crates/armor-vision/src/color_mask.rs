use image::{GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};

/// Binarizes a crop into light bar foreground (255) and background (0).
///
/// Implementations must return a mask with the same dimensions as the input.
pub trait ColorMask {
    fn apply(&self, image: &RgbImage) -> GrayImage;
}

/// Light bar color of the opposing team.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetColor {
    #[default]
    Red,
    Blue,
}

impl TargetColor {
    /// RGB channel indices of the team color and of the opposing color.
    fn channels(self) -> (usize, usize) {
        match self {
            TargetColor::Red => (0, 2),
            TargetColor::Blue => (2, 0),
        }
    }
}

/// Foreground where the team channel beats the opposing channel by
/// `min_difference` and is itself at least `min_brightness`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelDifferenceMask {
    pub team: TargetColor,
    pub min_difference: u8,
    pub min_brightness: u8,
}

impl Default for ChannelDifferenceMask {
    fn default() -> Self {
        Self {
            team: TargetColor::Red,
            min_difference: 60,
            min_brightness: 100,
        }
    }
}

impl ColorMask for ChannelDifferenceMask {
    fn apply(&self, image: &RgbImage) -> GrayImage {
        let (own_channel, other_channel) = self.team.channels();
        let mut mask = GrayImage::new(image.width(), image.height());
        for (src, dst) in image.pixels().zip(mask.pixels_mut()) {
            let own = src[own_channel];
            let other = src[other_channel];
            let on = own >= self.min_brightness
                && own.saturating_sub(other) >= self.min_difference;
            *dst = Luma([if on { 255 } else { 0 }]);
        }
        mask
    }
}
