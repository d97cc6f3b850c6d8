mod opencv_io;

use anyhow::Context;
use clap::Parser;
use color_tracker::{EventLoop, TrackingSession};
use color_tracker_viewer::{Args, init_logging};
use opencv_io::{VideoFileSource, WindowDisplay, WindowInput};
use tracing::info;

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    // --- 1. Video I/O Initialization ---
    let mut source = VideoFileSource::open(&args.video_path)
        .with_context(|| format!("Unable to open video at path {}", args.video_path.display()))?;
    let mut display = WindowDisplay::new(&args.window_name)?;
    let mut input = WindowInput::new(&args.window_name)?;

    // --- 2. Tracking Session Initialization ---
    let session = TrackingSession::with_font(args.tracker_config(), args.load_font()?)?;
    let mut event_loop = EventLoop::new(session);

    // --- 3. Main Processing Loop ---
    let summary = event_loop.run(&mut source, &mut display, &mut input)?;
    info!(frames = summary.frames, reason = ?summary.stop_reason, "processing complete");
    Ok(())
}
