//! Presentation drawn on top of captured frames: the placeholder shown when
//! capture fails and the calibration grid.

mod font;

use image::{Rgb, RgbImage};

use crate::capture::Rectangle;

pub const PLACEHOLDER_WIDTH: u32 = 640;
pub const PLACEHOLDER_HEIGHT: u32 = 480;

const TEXT_SCALE: u32 = 2;
const TEXT_MARGIN: i32 = 20;
const ERROR_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const GRID_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
const ROI_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const ROI_THICKNESS: u32 = 2;
const MIN_GRID_STEP: u32 = 50;
const MAX_GRID_STEP: u32 = 200;

/// Black 640x480 frame with `message` written across the middle.
pub fn error_frame(message: &str) -> RgbImage {
    let mut image = RgbImage::new(PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT);
    let line_height = (font::text_height(TEXT_SCALE) + 2 * TEXT_SCALE) as i32;
    let usable = PLACEHOLDER_WIDTH - 2 * TEXT_MARGIN as u32;
    let max_chars = ((usable + TEXT_SCALE) / font::advance(TEXT_SCALE)) as usize;

    let mut y = (PLACEHOLDER_HEIGHT / 2) as i32 - font::text_height(TEXT_SCALE) as i32;
    for line in font::wrap(message, max_chars) {
        font::draw_text(&mut image, TEXT_MARGIN, y, &line, ERROR_COLOR, TEXT_SCALE);
        y += line_height;
    }
    image
}

pub fn grid_step(width: u32) -> u32 {
    (width / 12).clamp(MIN_GRID_STEP, MAX_GRID_STEP)
}

/// Draws white lines every [`grid_step`] pixels, each labelled with its offset.
pub fn draw_grid(image: &mut RgbImage) {
    let (width, height) = image.dimensions();
    let step = grid_step(width) as usize;

    for x in (0..width).step_by(step) {
        vline(image, x as i64, 0, height as i64, GRID_COLOR);
        font::draw_text(image, x as i32 + 3, 6, &x.to_string(), GRID_COLOR, TEXT_SCALE);
    }
    for y in (0..height).step_by(step) {
        hline(image, 0, width as i64, y as i64, GRID_COLOR);
        font::draw_text(image, 3, y as i32 + 6, &y.to_string(), GRID_COLOR, TEXT_SCALE);
    }
}

/// Outlines `roi`, given in image coordinates, and labels it with its size.
pub fn outline_roi(image: &mut RgbImage, roi: Rectangle) {
    let left = roi.x as i64;
    let top = roi.y as i64;
    let right = roi.right();
    let bottom = roi.bottom();

    for t in 0..ROI_THICKNESS as i64 {
        hline(image, left - t, right + t + 1, top - t, ROI_COLOR);
        hline(image, left - t, right + t + 1, bottom + t, ROI_COLOR);
        vline(image, left - t, top - t, bottom + t + 1, ROI_COLOR);
        vline(image, right + t, top - t, bottom + t + 1, ROI_COLOR);
    }

    let label = format!("ROI {}x{}", roi.width, roi.height);
    let label_y = (roi.y - 10 - font::text_height(TEXT_SCALE) as i32).max(0);
    font::draw_text(image, roi.x, label_y, &label, ROI_COLOR, TEXT_SCALE);
}

fn hline(image: &mut RgbImage, x0: i64, x1: i64, y: i64, color: Rgb<u8>) {
    if y < 0 || y >= image.height() as i64 {
        return;
    }
    for x in x0.max(0)..x1.min(image.width() as i64) {
        image.put_pixel(x as u32, y as u32, color);
    }
}

fn vline(image: &mut RgbImage, x: i64, y0: i64, y1: i64, color: Rgb<u8>) {
    if x < 0 || x >= image.width() as i64 {
        return;
    }
    for y in y0.max(0)..y1.min(image.height() as i64) {
        image.put_pixel(x as u32, y as u32, color);
    }
}
