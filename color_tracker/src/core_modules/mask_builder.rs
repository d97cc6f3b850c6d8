// THEORY:
// The mask builder answers one question per pixel: "is this pixel close enough
// to the reference color?" Closeness is a fixed, channel-wise tolerance window
// around the reference in HSV space:
//
//   hue        within +-10 on the hue circle (wrap-around modulo 180)
//   saturation within [s - 40, s + 40], clamped to [0, 255]
//   value      within [v - 40, v + 40], clamped to [0, 255]
//
// Hue is circular: a reference hue of 2 accepts 172..=179 as well as 0..=12.
// Clamping it instead would silently lose half the window for reds, which sit
// at both ends of the range.
//
// The tolerances are policy constants of the engine, not user configuration.
// The output is a binary `GrayImage` of the frame's size: 255 for a match,
// 0 otherwise. The input frame is never modified.

use crate::core_modules::color_sample::ColorSample;
use crate::core_modules::hsv::{HUE_RANGE, Hsv, HsvImage, to_hsv_image};
use image::{GrayImage, Luma, RgbImage};
use imageproc::map::map_colors;

pub const HUE_TOLERANCE: u8 = 10;
pub const SATURATION_TOLERANCE: u8 = 40;
pub const VALUE_TOLERANCE: u8 = 40;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// A binary, single-channel image: `FOREGROUND` or `BACKGROUND` per pixel.
pub type Mask = GrayImage;

/// The acceptance window derived from one reference color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub hue_center: u8,
    pub hue_tolerance: u8,
    pub saturation: (u8, u8),
    pub value: (u8, u8),
}

impl HsvRange {
    pub fn around(reference: &ColorSample) -> Self {
        Self {
            hue_center: reference.hue(),
            hue_tolerance: HUE_TOLERANCE,
            saturation: (
                reference.saturation().saturating_sub(SATURATION_TOLERANCE),
                reference.saturation().saturating_add(SATURATION_TOLERANCE),
            ),
            value: (
                reference.value().saturating_sub(VALUE_TOLERANCE),
                reference.value().saturating_add(VALUE_TOLERANCE),
            ),
        }
    }

    pub fn contains(&self, hsv: Hsv) -> bool {
        hue_distance(hsv.hue, self.hue_center) <= self.hue_tolerance
            && (self.saturation.0..=self.saturation.1).contains(&hsv.saturation)
            && (self.value.0..=self.value.1).contains(&hsv.value)
    }
}

/// Shortest distance between two hues on the 180-step hue circle.
pub fn hue_distance(a: u8, b: u8) -> u8 {
    let direct = a.abs_diff(b) % HUE_RANGE;
    direct.min(HUE_RANGE - direct)
}

/// Builds the match mask of `reference` over an RGB frame.
pub fn build_mask(frame: &RgbImage, reference: &ColorSample) -> Mask {
    mask_from_hsv(&to_hsv_image(frame), reference)
}

/// Builds the match mask from an already converted frame, so several references
/// can share one conversion.
pub fn mask_from_hsv(hsv_image: &HsvImage, reference: &ColorSample) -> Mask {
    let range = HsvRange::around(reference);
    map_colors(hsv_image, |pixel| {
        let matched = range.contains(Hsv::from_channels(pixel));
        Luma([if matched { FOREGROUND } else { BACKGROUND }])
    })
}
