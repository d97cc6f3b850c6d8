// THEORY:
// The `pipeline` module is the top-level API of the tracking engine. The
// `TrackingSession` owns all mutable state (the processing mode and the tracked
// color set) and runs one frame at a time through the stages:
//
//   RAW         frame -> frame
//   HUE/SAT/VAL frame -> one HSV component as a grayscale image
//   TRACKER     frame -> HSV -> (per tracked color) mask -> regions -> annotated frame
//   MASK        frame -> HSV -> mask of the latest color -> cleaned mask
//
// Each frame is processed from its own pixels only. The session also keeps the
// last raw frame so that a click can be turned into a reference color; clicks
// are sampled from that raw copy, never from the annotated output.

use crate::core_modules::annotator::{Annotator, object_label};
use crate::core_modules::color_sample::{self, ColorSample};
use crate::core_modules::hsv::{HsvChannel, channel_image, to_hsv_image};
use crate::core_modules::mask_builder::{BACKGROUND, Mask, mask_from_hsv};
use crate::core_modules::processing_mode::ProcessingMode;
use crate::core_modules::region::Region;
use crate::core_modules::region_extractor::region_extractor::{clean_mask, find_regions, select};
use crate::core_modules::region_extractor::{DEFAULT_MIN_AREA, MorphologyConfig, SelectionPolicy};
use crate::core_modules::tracked_colors::TrackedColorSet;
use crate::error::{Result, TrackerError};
use ab_glyph::FontArc;
use image::{GrayImage, Luma, RgbImage};
use std::time::Duration;
use tracing::{debug, info};

// Re-export key data structures for the public API.
pub use crate::core_modules::tracked_colors::Registration;

/// Capacity used by the four-color revision of the tracker.
pub const DEFAULT_CAPACITY: usize = 4;
const DEFAULT_KEY_WAIT: Duration = Duration::from_millis(10);

/// Configuration for the TrackingSession, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// How many reference colors can be tracked before the set resets.
    pub capacity: usize,
    /// Regions must enclose strictly more than this many square pixels.
    pub min_area: f64,
    pub morphology: MorphologyConfig,
    /// `AllQualifying` for multi-blob tracking, `Largest` for single-target use.
    pub selection: SelectionPolicy,
    /// Bounded wait for a key press; also paces the control loop.
    pub key_wait: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            min_area: DEFAULT_MIN_AREA,
            morphology: MorphologyConfig::default(),
            selection: SelectionPolicy::AllQualifying,
            key_wait: DEFAULT_KEY_WAIT,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(TrackerError::Config("capacity must be at least 1".into()));
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(TrackerError::Config(format!(
                "min_area must be a non-negative number, got {}",
                self.min_area
            )));
        }
        Ok(())
    }
}

/// The output of one `process` call.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessedFrame {
    /// A three-channel RGB frame (RAW and TRACKER).
    Color(RgbImage),
    /// A single-channel image (HUE, SATURATION, VALUE and MASK).
    Single(GrayImage),
}

impl ProcessedFrame {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ProcessedFrame::Color(image) => image.dimensions(),
            ProcessedFrame::Single(image) => image.dimensions(),
        }
    }
}

/// The regions found for one tracked color in one frame.
#[derive(Debug, Clone)]
pub struct ColorDetections {
    pub color_index: usize,
    pub sample: ColorSample,
    pub regions: Vec<Region>,
}

/// The main, top-level struct for the tracking engine.
pub struct TrackingSession {
    config: TrackerConfig,
    mode: ProcessingMode,
    tracked_colors: TrackedColorSet,
    annotator: Annotator,
    last_frame: Option<RgbImage>,
    last_detections: Vec<ColorDetections>,
}

impl TrackingSession {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        Self::with_font(config, None)
    }

    /// Like `new`, with a font for region labels.
    pub fn with_font(config: TrackerConfig, font: Option<FontArc>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            tracked_colors: TrackedColorSet::new(config.capacity),
            mode: ProcessingMode::default(),
            annotator: Annotator::new(font),
            last_frame: None,
            last_detections: Vec::new(),
            config,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ProcessingMode) {
        if self.mode != mode {
            info!(from = %self.mode, to = %mode, "processing mode changed");
            self.mode = mode;
        }
    }

    pub fn tracked_colors(&self) -> &TrackedColorSet {
        &self.tracked_colors
    }

    /// Regions found for each tracked color during the last TRACKER frame.
    pub fn last_detections(&self) -> &[ColorDetections] {
        &self.last_detections
    }

    /// Samples the last raw frame at (x, y) and offers the color to the tracked
    /// set. A full set is cleared instead, and the clicked color is dropped.
    pub fn register_color_at(&mut self, x: u32, y: u32) -> Result<Registration> {
        let frame = self.last_frame.as_ref().ok_or(TrackerError::NoFrame)?;
        let registration = self
            .tracked_colors
            .register_with(|| color_sample::sample(frame, x, y))?;
        match &registration {
            Registration::Added { index, sample } => {
                info!(x, y, index, ?sample, "reference color registered")
            }
            Registration::Cleared { dropped } => info!(dropped, "tracked color set reset"),
        }
        Ok(registration)
    }

    /// Runs the active mode's pipeline on one frame.
    pub fn process(&mut self, frame: RgbImage) -> Result<ProcessedFrame> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(TrackerError::EmptyFrame);
        }
        self.last_frame = Some(frame.clone());

        let output = match self.mode {
            ProcessingMode::Raw => ProcessedFrame::Color(frame),
            ProcessingMode::Hue => ProcessedFrame::Single(channel_image(&frame, HsvChannel::Hue)),
            ProcessingMode::Saturation => {
                ProcessedFrame::Single(channel_image(&frame, HsvChannel::Saturation))
            }
            ProcessingMode::Value => ProcessedFrame::Single(channel_image(&frame, HsvChannel::Value)),
            ProcessingMode::Tracker => ProcessedFrame::Color(self.track(frame)),
            ProcessingMode::Mask => ProcessedFrame::Single(self.latest_mask(&frame)),
        };
        Ok(output)
    }

    /// Locates every tracked color and annotates its regions in place.
    fn track(&mut self, mut frame: RgbImage) -> RgbImage {
        self.last_detections.clear();
        if self.tracked_colors.is_empty() {
            return frame;
        }

        let hsv_image = to_hsv_image(&frame);
        for (color_index, sample) in self.tracked_colors.iter().enumerate() {
            let mask = mask_from_hsv(&hsv_image, sample);
            let cleaned = clean_mask(&mask, self.config.morphology);
            let regions = select(find_regions(&cleaned, self.config.min_area), self.config.selection);

            let label = object_label(color_index);
            for region in &regions {
                self.annotator.annotate(&mut frame, region, &label);
            }
            debug!(color_index, regions = regions.len(), "tracked color located");

            self.last_detections.push(ColorDetections {
                color_index,
                sample: *sample,
                regions,
            });
        }
        frame
    }

    fn latest_mask(&self, frame: &RgbImage) -> Mask {
        match self.tracked_colors.latest() {
            Some(sample) => {
                let mask = mask_from_hsv(&to_hsv_image(frame), sample);
                clean_mask(&mask, self.config.morphology)
            }
            None => {
                let (width, height) = frame.dimensions();
                GrayImage::from_pixel(width, height, Luma([BACKGROUND]))
            }
        }
    }
}
