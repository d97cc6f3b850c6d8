// THEORY:
// The `hsv` module is the color-space layer of the engine. Every other stage
// (sampling, mask building, the HUE/SATURATION/VALUE views) reasons about color
// in hue-saturation-value space, because separating chromatic tone from
// brightness tolerates lighting changes far better than comparing RGB channels.
//
// Conventions (8-bit, matching the common video tooling convention):
// - Hue:        degrees / 2, stored in [0, 179]. A rounded hue of 180 wraps to 0.
// - Saturation: 255 * (max - min) / max, 0 for black.
// - Value:      max(R, G, B).
// Achromatic pixels (max == min) report hue 0.
//
// Frames enter the engine as RGB. The only HSV "image" we ever materialize is an
// `HsvImage`, an `image::RgbImage` whose three channels hold H, S and V instead
// of R, G and B. It is built once per frame and shared by every tracked color.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::map::map_colors;

/// Exclusive upper bound of the 8-bit hue range.
pub const HUE_RANGE: u8 = 180;

/// An `RgbImage` whose channels carry (hue, saturation, value).
pub type HsvImage = RgbImage;

/// A single pixel in hue-saturation-value space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hsv {
    pub hue: u8,
    pub saturation: u8,
    pub value: u8,
}

/// Selects one component of an HSV pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HsvChannel {
    Hue,
    Saturation,
    Value,
}

impl Hsv {
    /// Converts one RGB pixel.
    pub fn from_rgb(pixel: Rgb<u8>) -> Self {
        let [red, green, blue] = pixel.0;
        let maximum_channel = red.max(green.max(blue));
        let minimum_channel = red.min(green.min(blue));

        if maximum_channel == minimum_channel {
            return Hsv {
                hue: 0,
                saturation: 0,
                value: maximum_channel,
            };
        }

        let chroma = (maximum_channel - minimum_channel) as f32;
        let saturation = (255.0 * chroma / maximum_channel as f32).round() as u8;

        let (base_difference, sector_offset) = if maximum_channel == red {
            (green as f32 - blue as f32, 0.0)
        } else if maximum_channel == green {
            (blue as f32 - red as f32, 2.0)
        } else {
            (red as f32 - green as f32, 4.0)
        };

        let mut hue_degrees = (base_difference / chroma + sector_offset) * 60.0;
        if hue_degrees < 0.0 {
            hue_degrees += 360.0;
        }
        let hue = ((hue_degrees / 2.0).round() as u16 % HUE_RANGE as u16) as u8;

        Hsv {
            hue,
            saturation,
            value: maximum_channel,
        }
    }

    pub fn channel(&self, channel: HsvChannel) -> u8 {
        match channel {
            HsvChannel::Hue => self.hue,
            HsvChannel::Saturation => self.saturation,
            HsvChannel::Value => self.value,
        }
    }

    /// Reads a pixel of an `HsvImage` back as an `Hsv`.
    pub fn from_channels(pixel: Rgb<u8>) -> Self {
        let [hue, saturation, value] = pixel.0;
        Hsv {
            hue,
            saturation,
            value,
        }
    }
}

/// Converts a whole RGB frame into an `HsvImage`.
pub fn to_hsv_image(frame: &RgbImage) -> HsvImage {
    map_colors(frame, |pixel| {
        let hsv = Hsv::from_rgb(pixel);
        Rgb([hsv.hue, hsv.saturation, hsv.value])
    })
}

/// Extracts a single HSV component of an RGB frame as a grayscale image.
pub fn channel_image(frame: &RgbImage, channel: HsvChannel) -> GrayImage {
    map_colors(frame, |pixel| Luma([Hsv::from_rgb(pixel).channel(channel)]))
}
