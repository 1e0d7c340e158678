use image::RgbaImage;
use xcap::Window;

use super::{CaptureError, Rectangle, WindowBBox, WindowInfo};

pub(super) fn list_windows() -> Result<Vec<WindowInfo>, CaptureError> {
    let windows = Window::all().map_err(CaptureError::backend)?;
    let window_infos: Vec<WindowInfo> = windows
        .into_iter()
        .filter(|w| !w.title().is_empty())
        .map(|w| WindowInfo {
            id: w.id(),
            title: w.title().to_string(),
            x: w.x(),
            y: w.y(),
            width: w.width(),
            height: w.height(),
            is_minimized: w.is_minimized(),
        })
        .collect();
    Ok(window_infos)
}

pub(super) fn capture_window(window_id: u32) -> Result<RgbaImage, CaptureError> {
    let window = Window::all()
        .map_err(CaptureError::backend)?
        .into_iter()
        .find(|w| w.id() == window_id)
        .ok_or_else(|| CaptureError::Backend(format!("Window {} disappeared", window_id)))?;
    window.capture_image().map_err(CaptureError::backend)
}

/// Picks the window whose title contains `title`.
///
/// Matching is a case-sensitive substring test. Among the matches the first
/// one in enumeration order that is not minimized wins; when every match is
/// minimized the first match is reported as such.
pub fn locate(windows: &[WindowInfo], title: &str) -> Result<WindowBBox, CaptureError> {
    let mut matches = windows.iter().filter(|w| w.title.contains(title)).peekable();

    let first = matches.peek().cloned().ok_or_else(|| CaptureError::NotFound {
        title: title.to_string(),
    })?;

    let window = matches
        .find(|w| !w.is_minimized)
        .ok_or_else(|| CaptureError::Minimized {
            title: first.title.clone(),
        })?;

    Ok(WindowBBox {
        id: window.id,
        title: window.title.clone(),
        bounds: Rectangle::new(window.x, window.y, window.width, window.height),
    })
}
