use image::RgbaImage;
use xcap::Monitor;

use super::{CaptureError, Rectangle};

/// Grabs `rect` from the monitor under its top-left corner. Anything that
/// spills past that monitor's edge is cut off.
pub(super) fn capture_region(rect: Rectangle) -> Result<RgbaImage, CaptureError> {
    let monitor = Monitor::from_point(rect.x, rect.y)
        .map_err(|_| CaptureError::OutOfBounds { x: rect.x, y: rect.y })?;
    let screen = monitor.capture_image().map_err(CaptureError::backend)?;
    crop_from_monitor(&screen, monitor.x(), monitor.y(), rect)
}

fn crop_from_monitor(
    screen: &RgbaImage,
    origin_x: i32,
    origin_y: i32,
    rect: Rectangle,
) -> Result<RgbaImage, CaptureError> {
    let out_of_bounds = || CaptureError::OutOfBounds { x: rect.x, y: rect.y };

    let src_x = u32::try_from(rect.x as i64 - origin_x as i64).map_err(|_| out_of_bounds())?;
    let src_y = u32::try_from(rect.y as i64 - origin_y as i64).map_err(|_| out_of_bounds())?;
    let width = rect.width.min(screen.width().saturating_sub(src_x));
    let height = rect.height.min(screen.height().saturating_sub(src_y));

    if width == 0 || height == 0 {
        return Err(out_of_bounds());
    }

    Ok(image::imageops::crop_imm(screen, src_x, src_y, width, height).to_image())
}
