//! Command line and logging setup for the color tracker viewer.
//!
//! The OpenCV window itself lives in the binary; everything here builds and
//! tests without a system OpenCV.

use ab_glyph::FontArc;
use anyhow::{Context, anyhow};
use clap::Parser;
use color_tracker::TrackerConfig;
use color_tracker::core_modules::region_extractor::{DEFAULT_MIN_AREA, SelectionPolicy};
use color_tracker::pipeline::DEFAULT_CAPACITY;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Track colors in a video by clicking on them.
///
/// Keys: h hue, s saturation, v value, r raw, t tracker, m mask, q/Esc quit.
/// In tracker mode a left click adds the color under the cursor; clicking once
/// more after the set is full clears it.
#[derive(Parser, Debug, Clone)]
#[command(name = "color_tracker_viewer", version)]
pub struct Args {
    /// Path to the video that will be processed.
    #[arg(short = 'v', long = "video-path", alias = "video_path")]
    pub video_path: PathBuf,

    /// How many colors can be tracked before the next click resets the set.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Regions must enclose more than this many square pixels.
    #[arg(long, default_value_t = DEFAULT_MIN_AREA)]
    pub min_area: f64,

    /// Keep only the largest region per color.
    #[arg(long)]
    pub single_target: bool,

    /// TrueType font used for region labels.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Milliseconds to wait for a key press each frame.
    #[arg(long, default_value_t = 10)]
    pub wait_ms: u64,

    #[arg(long, default_value = "Color tracker")]
    pub window_name: String,
}

impl Args {
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            capacity: self.capacity,
            min_area: self.min_area,
            selection: if self.single_target {
                SelectionPolicy::Largest
            } else {
                SelectionPolicy::AllQualifying
            },
            key_wait: Duration::from_millis(self.wait_ms),
            ..TrackerConfig::default()
        }
    }

    pub fn load_font(&self) -> anyhow::Result<Option<FontArc>> {
        let Some(path) = &self.font else {
            return Ok(None);
        };
        let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|err| anyhow!("parsing font {}: {err}", path.display()))?;
        Ok(Some(font))
    }
}

/// Logs to stderr at `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
