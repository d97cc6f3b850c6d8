//! The control loop and its I/O collaborators.
//!
//! The engine never touches a window or a decoder itself. A frontend implements
//! [`FrameSource`], [`DisplaySink`] and [`InputSource`], and [`EventLoop`] drives
//! them: read one frame, process it, show it, poll one key, apply the clicks made
//! while that frame was on screen.
//! Everything runs on the caller's thread.

use crate::core_modules::processing_mode::ProcessingMode;
use crate::error::{Result, TrackerError};
use crate::pipeline::{ProcessedFrame, TrackingSession};
use image::RgbImage;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const KEY_ESCAPE: i32 = 27;

/// Produces frames until the stream ends.
pub trait FrameSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The next RGB frame, or `None` at end of stream.
    fn read_next_frame(&mut self) -> std::result::Result<Option<RgbImage>, Self::Error>;
}

/// Presents processed frames to the operator.
pub trait DisplaySink {
    type Error: std::error::Error + Send + Sync + 'static;

    fn show(&mut self, frame: &ProcessedFrame) -> std::result::Result<(), Self::Error>;
}

/// A left-click at pixel coordinates of the displayed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click {
    pub x: u32,
    pub y: u32,
}

/// Keyboard and mouse input.
pub trait InputSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Waits at most `timeout` for a key press and returns its code.
    fn poll_key(&mut self, timeout: Duration) -> std::result::Result<Option<i32>, Self::Error>;

    /// Clicks received since the previous call, oldest first.
    fn take_clicks(&mut self) -> Vec<Click>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(ProcessingMode),
    Quit,
}

/// The fixed key table. Unknown keys map to `None`.
pub fn command_for_key(key: i32) -> Option<Command> {
    if key == KEY_ESCAPE {
        return Some(Command::Quit);
    }
    let key = u8::try_from(key).ok()?;
    let command = match key {
        b'h' => Command::SetMode(ProcessingMode::Hue),
        b's' => Command::SetMode(ProcessingMode::Saturation),
        b'v' => Command::SetMode(ProcessingMode::Value),
        b'r' => Command::SetMode(ProcessingMode::Raw),
        b't' => Command::SetMode(ProcessingMode::Tracker),
        b'm' => Command::SetMode(ProcessingMode::Mask),
        b'q' => Command::Quit,
        _ => return None,
    };
    Some(command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndOfStream,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub stop_reason: StopReason,
}

pub struct EventLoop {
    session: TrackingSession,
}

impl EventLoop {
    pub fn new(session: TrackingSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &TrackingSession {
        &self.session
    }

    pub fn into_session(self) -> TrackingSession {
        self.session
    }

    /// Runs until the source is exhausted or the operator quits.
    pub fn run<S, D, I>(&mut self, source: &mut S, sink: &mut D, input: &mut I) -> Result<LoopSummary>
    where
        S: FrameSource,
        D: DisplaySink,
        I: InputSource,
    {
        let key_wait = self.session.config().key_wait;
        let mut frames = 0u64;

        loop {
            let Some(frame) = source.read_next_frame().map_err(TrackerError::collaborator)? else {
                info!(frames, "end of stream");
                return Ok(LoopSummary {
                    frames,
                    stop_reason: StopReason::EndOfStream,
                });
            };
            frames += 1;

            let output = self.session.process(frame)?;
            sink.show(&output).map_err(TrackerError::collaborator)?;

            // Clicks arrive while the window waits for a key; they refer to the
            // frame just shown and must be applied before the next read.
            let key = input.poll_key(key_wait).map_err(TrackerError::collaborator)?;
            for click in input.take_clicks() {
                self.apply_click(click)?;
            }

            match key.and_then(command_for_key) {
                Some(Command::Quit) => {
                    info!(frames, "quit requested");
                    return Ok(LoopSummary {
                        frames,
                        stop_reason: StopReason::Quit,
                    });
                }
                Some(Command::SetMode(mode)) => self.session.set_mode(mode),
                None => {}
            }
        }
    }

    fn apply_click(&mut self, click: Click) -> Result<()> {
        if !self.session.mode().accepts_clicks() {
            debug!(?click, mode = %self.session.mode(), "click ignored outside tracker mode");
            return Ok(());
        }
        match self.session.register_color_at(click.x, click.y) {
            Ok(_) => Ok(()),
            // The window may report clicks on its border, just past the frame.
            Err(TrackerError::OutOfBounds { .. }) => {
                warn!(?click, "click outside the frame ignored");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::color_sample::ColorSample;
    use crate::pipeline::TrackerConfig;
    use image::Rgb;
    use std::collections::VecDeque;
    use std::convert::Infallible;

    struct ScriptedSource {
        frames: VecDeque<RgbImage>,
    }

    impl FrameSource for ScriptedSource {
        type Error = Infallible;

        fn read_next_frame(&mut self) -> std::result::Result<Option<RgbImage>, Infallible> {
            Ok(self.frames.pop_front())
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        shown: Vec<ProcessedFrame>,
    }

    impl DisplaySink for RecordingSink {
        type Error = Infallible;

        fn show(&mut self, frame: &ProcessedFrame) -> std::result::Result<(), Infallible> {
            self.shown.push(frame.clone());
            Ok(())
        }
    }

    /// One entry per iteration: the key pressed, and the clicks delivered
    /// during that key wait.
    struct ScriptedInput {
        steps: VecDeque<(Option<i32>, Vec<Click>)>,
        pending_clicks: Vec<Click>,
    }

    impl ScriptedInput {
        fn new(steps: Vec<(Option<i32>, Vec<Click>)>) -> Self {
            Self {
                steps: steps.into(),
                pending_clicks: Vec::new(),
            }
        }
    }

    impl InputSource for ScriptedInput {
        type Error = Infallible;

        fn poll_key(&mut self, _timeout: Duration) -> std::result::Result<Option<i32>, Infallible> {
            let (key, clicks) = self.steps.pop_front().unwrap_or_default();
            self.pending_clicks.extend(clicks);
            Ok(key)
        }

        fn take_clicks(&mut self) -> Vec<Click> {
            std::mem::take(&mut self.pending_clicks)
        }
    }

    fn frames(count: usize) -> VecDeque<RgbImage> {
        (0..count)
            .map(|_| RgbImage::from_pixel(20, 20, Rgb([200, 30, 30])))
            .collect()
    }

    fn event_loop() -> EventLoop {
        EventLoop::new(TrackingSession::new(TrackerConfig::default()).unwrap())
    }

    #[test]
    fn key_table_maps_every_mode() {
        assert_eq!(command_for_key('h' as i32), Some(Command::SetMode(ProcessingMode::Hue)));
        assert_eq!(
            command_for_key('s' as i32),
            Some(Command::SetMode(ProcessingMode::Saturation))
        );
        assert_eq!(command_for_key('v' as i32), Some(Command::SetMode(ProcessingMode::Value)));
        assert_eq!(command_for_key('r' as i32), Some(Command::SetMode(ProcessingMode::Raw)));
        assert_eq!(command_for_key('t' as i32), Some(Command::SetMode(ProcessingMode::Tracker)));
        assert_eq!(command_for_key('m' as i32), Some(Command::SetMode(ProcessingMode::Mask)));
        assert_eq!(command_for_key('q' as i32), Some(Command::Quit));
        assert_eq!(command_for_key(KEY_ESCAPE), Some(Command::Quit));
        assert_eq!(command_for_key('x' as i32), None);
        assert_eq!(command_for_key(-1), None);
        assert_eq!(command_for_key(0x1_0068), None);
    }

    #[test]
    fn stops_at_end_of_stream() {
        let mut source = ScriptedSource { frames: frames(3) };
        let mut sink = RecordingSink::default();
        let mut input = ScriptedInput::new(Vec::new());

        let summary = event_loop().run(&mut source, &mut sink, &mut input).unwrap();
        assert_eq!(
            summary,
            LoopSummary {
                frames: 3,
                stop_reason: StopReason::EndOfStream
            }
        );
        assert_eq!(sink.shown.len(), 3);
    }

    #[test]
    fn quit_key_stops_after_the_current_frame() {
        let mut source = ScriptedSource { frames: frames(5) };
        let mut sink = RecordingSink::default();
        let mut input = ScriptedInput::new(vec![(None, vec![]), (Some('q' as i32), vec![])]);

        let summary = event_loop().run(&mut source, &mut sink, &mut input).unwrap();
        assert_eq!(summary.frames, 2);
        assert_eq!(summary.stop_reason, StopReason::Quit);
    }

    #[test]
    fn mode_keys_switch_the_pipeline_from_the_next_frame() {
        let mut source = ScriptedSource { frames: frames(3) };
        let mut sink = RecordingSink::default();
        let mut input = ScriptedInput::new(vec![(Some('h' as i32), vec![]), (Some('h' as i32), vec![])]);

        let mut event_loop = event_loop();
        event_loop.run(&mut source, &mut sink, &mut input).unwrap();
        assert!(matches!(sink.shown[0], ProcessedFrame::Color(_)));
        assert!(matches!(sink.shown[1], ProcessedFrame::Single(_)));
        assert!(matches!(sink.shown[2], ProcessedFrame::Single(_)));
        assert_eq!(event_loop.session().mode(), ProcessingMode::Hue);
    }

    #[test]
    fn clicks_register_only_in_tracker_mode() {
        let mut source = ScriptedSource { frames: frames(3) };
        let mut sink = RecordingSink::default();
        let mut input = ScriptedInput::new(vec![
            (Some('t' as i32), vec![Click { x: 1, y: 1 }]),
            (None, vec![Click { x: 2, y: 2 }, Click { x: 25, y: 3 }]),
        ]);

        let mut event_loop = event_loop();
        event_loop.run(&mut source, &mut sink, &mut input).unwrap();
        assert_eq!(event_loop.session().tracked_colors().len(), 1);
    }

    #[test]
    fn clicks_sample_the_frame_on_screen() {
        let blue = RgbImage::from_pixel(20, 20, Rgb([0, 0, 255]));
        let red = RgbImage::from_pixel(20, 20, Rgb([255, 0, 0]));
        let mut source = ScriptedSource {
            frames: VecDeque::from(vec![blue.clone(), red, blue]),
        };
        let mut sink = RecordingSink::default();
        // 't' on the first frame, then a click while the red frame is shown.
        let mut input = ScriptedInput::new(vec![
            (Some('t' as i32), vec![]),
            (None, vec![Click { x: 5, y: 5 }]),
        ]);

        let mut event_loop = event_loop();
        event_loop.run(&mut source, &mut sink, &mut input).unwrap();
        let tracked = event_loop.session().tracked_colors().as_slice();
        assert_eq!(tracked.len(), 1);
        assert_eq!(tracked[0], ColorSample::new(0, 255, 255));
    }
}
