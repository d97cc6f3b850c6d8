// THEORY:
// This file is the main entry point for the `color_tracker` library crate.
//
// The engine follows an operator-driven loop: an operator points at up to a few
// reference colors in a video, and every subsequent frame is searched for
// regions of those colors, which are then outlined and labelled.
//
// The public surface is small:
// - `pipeline::TrackingSession` (with `TrackerConfig`) runs one frame through the
//   active processing mode and owns the tracked colors.
// - `controller::EventLoop` drives a session against a frame source, a display
//   and an input device, all supplied by the frontend through traits.
// The per-stage building blocks live in `core_modules` and are public for
// frontends and tests that want a single stage on its own.

pub mod controller;
pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use controller::{Click, Command, DisplaySink, EventLoop, FrameSource, InputSource, LoopSummary, StopReason};
pub use core_modules::color_sample::ColorSample;
pub use core_modules::processing_mode::ProcessingMode;
pub use error::{Result, TrackerError};
pub use pipeline::{ProcessedFrame, Registration, TrackerConfig, TrackingSession};
