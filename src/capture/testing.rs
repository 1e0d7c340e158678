//! In-memory [`Desktop`] for tests that must run without a display.

use image::{Rgba, RgbaImage};
use std::sync::Mutex;

use super::{CaptureError, Desktop, Rectangle, WindowInfo};

pub const FILL: Rgba<u8> = Rgba([40, 120, 200, 255]);

#[derive(Default)]
pub struct FakeDesktop {
    windows: Vec<WindowInfo>,
    failure: Option<CaptureError>,
    captured: Mutex<Vec<Rectangle>>,
}

impl FakeDesktop {
    pub fn with_window(title: &str, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            windows: vec![WindowInfo {
                id: 1,
                title: title.to_string(),
                x,
                y,
                width,
                height,
                is_minimized: false,
            }],
            ..Default::default()
        }
    }

    pub fn minimized(mut self) -> Self {
        for window in &mut self.windows {
            window.is_minimized = true;
        }
        self
    }

    pub fn failing(mut self, err: CaptureError) -> Self {
        self.failure = Some(err);
        self
    }

    pub fn captured_regions(&self) -> Vec<Rectangle> {
        self.captured.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Desktop for FakeDesktop {
    fn windows(&self) -> Result<Vec<WindowInfo>, CaptureError> {
        Ok(self.windows.clone())
    }

    fn capture_region(&self, rect: Rectangle) -> Result<RgbaImage, CaptureError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.captured
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(rect);
        Ok(RgbaImage::from_pixel(rect.width, rect.height, FILL))
    }

    fn capture_window(&self, window_id: u32) -> Result<RgbaImage, CaptureError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let window = self
            .windows
            .iter()
            .find(|w| w.id == window_id)
            .ok_or_else(|| CaptureError::Backend(format!("Window {} disappeared", window_id)))?;
        Ok(RgbaImage::from_pixel(window.width, window.height, FILL))
    }
}
