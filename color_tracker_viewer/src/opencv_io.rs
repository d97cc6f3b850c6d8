//! OpenCV implementations of the engine's frame source, display and input.
//!
//! OpenCV decodes to BGR; the engine works in RGB. Conversion happens here, at
//! the edge, in both directions.

use color_tracker::controller::{Click, DisplaySink, FrameSource, InputSource};
use color_tracker::ProcessedFrame;
use image::RgbImage;
use opencv::{
    core::{self, Mat, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::debug;

pub struct VideoFileSource {
    capture: VideoCapture,
    bgr: Mat,
    rgb: Mat,
}

impl VideoFileSource {
    pub fn open(path: &Path) -> opencv::Result<Self> {
        let path = path.to_string_lossy();
        let capture = VideoCapture::from_file(&path, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(opencv::Error::new(
                core::StsError,
                format!("cannot open {path}"),
            ));
        }
        debug!(
            width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)?,
            height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?,
            fps = capture.get(videoio::CAP_PROP_FPS)?,
            "video opened"
        );
        Ok(Self {
            capture,
            bgr: Mat::default(),
            rgb: Mat::default(),
        })
    }
}

impl FrameSource for VideoFileSource {
    type Error = opencv::Error;

    fn read_next_frame(&mut self) -> opencv::Result<Option<RgbImage>> {
        if !self.capture.read(&mut self.bgr)? || self.bgr.empty() {
            return Ok(None);
        }
        imgproc::cvt_color(&self.bgr, &mut self.rgb, imgproc::COLOR_BGR2RGB, 0)?;
        let (width, height) = (self.rgb.cols() as u32, self.rgb.rows() as u32);
        let data = self.rgb.data_bytes()?.to_vec();
        RgbImage::from_raw(width, height, data)
            .map(Some)
            .ok_or_else(|| opencv::Error::new(core::StsError, "decoded frame has an unexpected layout"))
    }
}

pub struct WindowDisplay {
    window_name: String,
}

impl WindowDisplay {
    pub fn new(window_name: &str) -> opencv::Result<Self> {
        highgui::named_window(window_name, highgui::WINDOW_AUTOSIZE)?;
        Ok(Self {
            window_name: window_name.to_string(),
        })
    }

    fn to_mat(frame: &ProcessedFrame) -> opencv::Result<Mat> {
        let (width, height) = frame.dimensions();
        let size = core::Size::new(width as i32, height as i32);
        match frame {
            ProcessedFrame::Color(image) => {
                let mut rgb = Mat::new_size_with_default(size, core::CV_8UC3, Scalar::all(0.0))?;
                rgb.data_bytes_mut()?.copy_from_slice(image.as_raw());
                let mut bgr = Mat::default();
                imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
                Ok(bgr)
            }
            ProcessedFrame::Single(image) => {
                let mut gray = Mat::new_size_with_default(size, core::CV_8UC1, Scalar::all(0.0))?;
                gray.data_bytes_mut()?.copy_from_slice(image.as_raw());
                Ok(gray)
            }
        }
    }
}

impl DisplaySink for WindowDisplay {
    type Error = opencv::Error;

    fn show(&mut self, frame: &ProcessedFrame) -> opencv::Result<()> {
        let mat = Self::to_mat(frame)?;
        highgui::imshow(&self.window_name, &mat)
    }
}

pub struct WindowInput {
    clicks: Receiver<Click>,
}

impl WindowInput {
    /// Subscribes to left clicks on the window; they are queued until the loop
    /// collects them.
    pub fn new(window_name: &str) -> opencv::Result<Self> {
        let (tx, rx) = mpsc::channel();
        highgui::set_mouse_callback(
            window_name,
            Some(Box::new(move |event, x, y, _flags| {
                if event != highgui::EVENT_LBUTTONDOWN || x < 0 || y < 0 {
                    return;
                }
                let _ = tx.send(Click {
                    x: x as u32,
                    y: y as u32,
                });
            })),
        )?;
        Ok(Self { clicks: rx })
    }
}

impl InputSource for WindowInput {
    type Error = opencv::Error;

    fn poll_key(&mut self, timeout: Duration) -> opencv::Result<Option<i32>> {
        let delay = timeout.as_millis().clamp(1, i32::MAX as u128) as i32;
        let key = highgui::wait_key(delay)?;
        Ok((key >= 0).then_some(key & 0xFF))
    }

    fn take_clicks(&mut self) -> Vec<Click> {
        self.clicks.try_iter().collect()
    }
}
