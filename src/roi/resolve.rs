use crate::capture::Rectangle;

use super::{AbsoluteRoi, RelativeRoi, RoiSpec};

/// Maps `spec` onto the window at `window` and trims `clamp` pixels from every
/// side of the result. Out-of-range input is clamped, never rejected, and the
/// returned rectangle is always at least 1x1.
pub fn resolve(window: &Rectangle, spec: &RoiSpec, clamp: u32) -> Rectangle {
    let rect = match spec {
        RoiSpec::Absolute(roi) => from_absolute(window, roi),
        RoiSpec::Relative(roi) => from_relative(window, roi),
    };
    shrink(rect, clamp)
}

fn from_absolute(window: &Rectangle, roi: &AbsoluteRoi) -> Rectangle {
    let x = roi.x.max(0) as i64;
    let y = roi.y.max(0) as i64;
    let w = (roi.w as i64).min(window.width as i64 - x).max(1);
    let h = (roi.h as i64).min(window.height as i64 - y).max(1);

    Rectangle::new(
        saturate(window.x as i64 + x),
        saturate(window.y as i64 + y),
        w as u32,
        h as u32,
    )
}

fn from_relative(window: &Rectangle, roi: &RelativeRoi) -> Rectangle {
    let left = unit(roi.left);
    let top = unit(roi.top);
    let right = unit(roi.right);
    let bottom = unit(roi.bottom);

    let origin_x = window.x as f64;
    let origin_y = window.y as f64;
    let width = window.width as f64;
    let height = window.height as f64;

    let x0 = (origin_x + width * left.min(right)) as i64;
    let y0 = (origin_y + height * top.min(bottom)) as i64;
    let x1 = (origin_x + width * left.max(right)) as i64;
    let y1 = (origin_y + height * top.max(bottom)) as i64;

    Rectangle::normalize(saturate(x0), saturate(y0), saturate(x1), saturate(y1))
}

fn shrink(rect: Rectangle, clamp: u32) -> Rectangle {
    if clamp == 0 {
        return rect;
    }
    let clamp = clamp as i64;
    Rectangle::new(
        saturate(rect.x as i64 + clamp),
        saturate(rect.y as i64 + clamp),
        (rect.width as i64 - 2 * clamp).max(1) as u32,
        (rect.height as i64 - 2 * clamp).max(1) as u32,
    )
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
