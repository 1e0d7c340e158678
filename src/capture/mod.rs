mod grabber;
mod region;
mod window;

#[cfg(test)]
pub mod testing;

pub use grabber::FrameGrabber;
pub use window::locate;

use image::{RgbImage, RgbaImage};
use serde::Serialize;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Window '{title}' not found")]
    NotFound { title: String },
    #[error("Window '{title}' is minimized")]
    Minimized { title: String },
    #[error("Capture region ({x}, {y}) is not on any monitor")]
    OutOfBounds { x: i32, y: i32 },
    #[error("Capture failed: {0}")]
    Backend(String),
}

impl CaptureError {
    pub(crate) fn backend(err: impl std::fmt::Display) -> Self {
        CaptureError::Backend(err.to_string())
    }
}

/// Screen-space rectangle. Width and height are never zero once resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rectangle {
    #[serde(rename = "left")]
    pub x: i32,
    #[serde(rename = "top")]
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Builds a rectangle from two corners in any order, never narrower than one pixel.
    pub fn normalize(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Self {
        let x = start_x.min(end_x);
        let y = start_y.min(end_y);
        let width = (start_x - end_x).unsigned_abs().max(1);
        let height = (start_y - end_y).unsigned_abs().max(1);
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

#[derive(Debug, Clone)]
pub struct WindowInfo {
    pub id: u32,
    pub title: String,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_minimized: bool,
}

/// Where a window sat on screen at the moment it was looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowBBox {
    pub id: u32,
    pub title: String,
    pub bounds: Rectangle,
}

/// The slice of the operating system the capture pipeline talks to.
pub trait Desktop: Send + Sync {
    fn windows(&self) -> Result<Vec<WindowInfo>, CaptureError>;
    fn capture_region(&self, rect: Rectangle) -> Result<RgbaImage, CaptureError>;
    fn capture_window(&self, window_id: u32) -> Result<RgbaImage, CaptureError>;
}

/// [`Desktop`] backed by the platform capture APIs through `xcap`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapDesktop;

impl Desktop for XcapDesktop {
    fn windows(&self) -> Result<Vec<WindowInfo>, CaptureError> {
        window::list_windows()
    }

    fn capture_region(&self, rect: Rectangle) -> Result<RgbaImage, CaptureError> {
        region::capture_region(rect)
    }

    fn capture_window(&self, window_id: u32) -> Result<RgbaImage, CaptureError> {
        window::capture_window(window_id)
    }
}

pub fn to_rgb(image: RgbaImage) -> RgbImage {
    image::DynamicImage::ImageRgba8(image).to_rgb8()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_swaps_corners() {
        let rect = Rectangle::normalize(30, 40, 10, 20);
        assert_eq!(rect, Rectangle::new(10, 20, 20, 20));
    }

    #[test]
    fn test_normalize_floors_at_one_pixel() {
        let rect = Rectangle::normalize(5, 5, 5, 5);
        assert_eq!(rect.width, 1);
        assert_eq!(rect.height, 1);
    }

    #[test]
    fn test_rectangle_serializes_with_screen_names() {
        let json = serde_json::to_value(Rectangle::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, serde_json::json!({"left": 1, "top": 2, "width": 3, "height": 4}));
    }

    #[test]
    fn test_to_rgb_drops_alpha() {
        let rgba = RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 0]));
        let rgb = to_rgb(rgba);
        assert_eq!(rgb.get_pixel(1, 1), &image::Rgb([10, 20, 30]));
    }
}
