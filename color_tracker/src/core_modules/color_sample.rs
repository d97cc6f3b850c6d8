// THEORY:
// A `ColorSample` is the operator's reference color: the HSV value of the single
// pixel they pointed at. It is a "dumb", immutable data container. It is created
// once by `sample` and then only read, by the mask builder, for as long as it
// stays in the tracked color set.

use crate::core_modules::hsv::{HUE_RANGE, Hsv};
use crate::error::{Result, TrackerError};
use image::RgbImage;

/// An immutable reference color in 8-bit HSV space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorSample {
    hue: u8,
    saturation: u8,
    value: u8,
}

impl ColorSample {
    /// Builds a sample from raw components. Hue is folded into [0, 179].
    pub fn new(hue: u8, saturation: u8, value: u8) -> Self {
        Self {
            hue: hue % HUE_RANGE,
            saturation,
            value,
        }
    }

    pub fn hue(&self) -> u8 {
        self.hue
    }

    pub fn saturation(&self) -> u8 {
        self.saturation
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn as_hsv(&self) -> Hsv {
        Hsv {
            hue: self.hue,
            saturation: self.saturation,
            value: self.value,
        }
    }
}

impl From<Hsv> for ColorSample {
    fn from(hsv: Hsv) -> Self {
        ColorSample::new(hsv.hue, hsv.saturation, hsv.value)
    }
}

/// Samples the HSV color of the pixel at (x, y).
///
/// Fails loudly on an empty frame or a coordinate outside the frame instead of
/// producing a garbage color.
pub fn sample(frame: &RgbImage, x: u32, y: u32) -> Result<ColorSample> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(TrackerError::EmptyFrame);
    }
    if x >= width || y >= height {
        return Err(TrackerError::OutOfBounds {
            x,
            y,
            width,
            height,
        });
    }
    Ok(ColorSample::from(Hsv::from_rgb(*frame.get_pixel(x, y))))
}
