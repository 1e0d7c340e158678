mod mjpeg;
mod streamer;

pub use mjpeg::{multipart_part, CONTENT_TYPE};
pub use streamer::{Disconnected, FrameSink, MjpegStreamer};

use image::RgbImage;
use std::time::Duration;

use crate::capture::{CaptureError, FrameGrabber};
use crate::overlay;
use crate::roi::RoiSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Capturing,
    Encoding,
    Emitting,
}

/// Pacing and encoding knobs fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSettings {
    pub fps: u32,
    pub jpeg_quality: u8,
}

impl StreamSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

/// Captures the current ROI. A failed capture yields the placeholder frame
/// together with the error that caused it.
pub fn roi_frame(grabber: &FrameGrabber, roi: &RoiSnapshot) -> (RgbImage, Option<CaptureError>) {
    match grabber.capture_roi(roi) {
        Ok(image) => (image, None),
        Err(err) => (overlay::error_frame(&err.to_string()), Some(err)),
    }
}
