// THEORY:
// The annotator is the only stage that writes to a frame. For every selected
// region it draws a green, two-pixel outline on the bounding box and a short
// label just above its top-left corner. Drawing is clipped to the frame, so a
// region touching the border is drawn partially rather than panicking.
//
// Text needs a TrueType font. The font is handed in by the caller; without one
// the annotator still draws rectangles and says so once, at construction.

use crate::core_modules::region::Region;
use ab_glyph::{FontArc, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use tracing::warn;

pub const ANNOTATION_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
pub const STROKE_WIDTH: u32 = 2;
/// Vertical gap between the bottom of a label and the top of its box.
pub const LABEL_GAP: i32 = 10;
pub const LABEL_SCALE: f32 = 20.0;

/// The label drawn for the tracked color at `index` (zero-based).
pub fn object_label(index: usize) -> String {
    format!("Object_{}", index + 1)
}

pub struct Annotator {
    font: Option<FontArc>,
    scale: PxScale,
}

impl Annotator {
    pub fn new(font: Option<FontArc>) -> Self {
        if font.is_none() {
            warn!("no label font configured, regions will be drawn without labels");
        }
        Self {
            font,
            scale: PxScale::from(LABEL_SCALE),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Outlines `region` on `frame` and writes `label` above it.
    pub fn annotate(&self, frame: &mut RgbImage, region: &Region, label: &str) {
        let bbox = region.bounding_box;
        for inset in 0..STROKE_WIDTH {
            let width = bbox.width.saturating_sub(2 * inset);
            let height = bbox.height.saturating_sub(2 * inset);
            if width == 0 || height == 0 {
                break;
            }
            let rect = Rect::at((bbox.x + inset) as i32, (bbox.y + inset) as i32).of_size(width, height);
            draw_hollow_rect_mut(frame, rect, ANNOTATION_COLOR);
        }

        if let Some(font) = &self.font {
            let (_, text_height) = text_size(self.scale, font, label);
            let top = (bbox.y as i32 - LABEL_GAP - text_height as i32).max(0);
            draw_text_mut(frame, ANNOTATION_COLOR, bbox.x as i32, top, self.scale, font, label);
        }
    }
}
