//! Blocking frame builders behind the snapshot endpoints. Capture failures
//! turn into the placeholder frame here; encode failures are returned.

use tracing::warn;

use crate::capture::Rectangle;
use crate::encode::EncodeError;
use crate::overlay;
use crate::stream::roi_frame;

use super::AppState;

pub fn snapshot_jpeg(state: &AppState) -> Result<Vec<u8>, EncodeError> {
    let (image, err) = roi_frame(&state.grabber, &state.roi.snapshot());
    if let Some(err) = err {
        warn!(error = %err, "Snapshot capture failed");
    }
    state.encoder.encode(&image, state.settings.jpeg_quality)
}

pub fn full_window_jpeg(state: &AppState) -> Result<Vec<u8>, EncodeError> {
    let image = match state.grabber.capture_full_window() {
        Ok((image, _)) => image,
        Err(err) => {
            warn!(error = %err, "Full window capture failed");
            overlay::error_frame(&err.to_string())
        }
    };
    state.encoder.encode(&image, state.settings.jpeg_quality)
}

/// Full window with a coordinate grid and the current ROI outlined. Falls
/// back to the ROI frame when the whole window cannot be captured.
pub fn grid_jpeg(state: &AppState) -> Result<Vec<u8>, EncodeError> {
    let roi = state.roi.snapshot();
    let mut image = match state.grabber.capture_full_window() {
        Ok((image, _)) => image,
        Err(err) => {
            warn!(error = %err, "Full window capture failed, using ROI frame");
            roi_frame(&state.grabber, &roi).0
        }
    };

    overlay::draw_grid(&mut image);

    if let Ok(window) = state.grabber.locate() {
        let rect = roi.resolve(&window.bounds);
        let local = Rectangle::new(
            rect.x - window.bounds.x,
            rect.y - window.bounds.y,
            rect.width,
            rect.height,
        );
        overlay::outline_roi(&mut image, local);
    }

    state.encoder.encode(&image, state.settings.jpeg_quality)
}
