use image::RgbImage;
use std::sync::Arc;

use crate::roi::RoiSnapshot;

use super::{locate, to_rgb, CaptureError, Desktop, Rectangle, WindowBBox};

/// Captures the configured window, either the resolved ROI or the whole thing.
#[derive(Clone)]
pub struct FrameGrabber {
    desktop: Arc<dyn Desktop>,
    title: String,
}

impl FrameGrabber {
    pub fn new(desktop: Arc<dyn Desktop>, title: impl Into<String>) -> Self {
        Self {
            desktop,
            title: title.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Looks the window up again. Nothing is cached between calls.
    pub fn locate(&self) -> Result<WindowBBox, CaptureError> {
        let windows = self.desktop.windows()?;
        locate(&windows, &self.title)
    }

    pub fn capture_region(&self, rect: Rectangle) -> Result<RgbImage, CaptureError> {
        self.desktop.capture_region(rect).map(to_rgb)
    }

    /// Finds the window, resolves `roi` against it and captures the result.
    pub fn capture_roi(&self, roi: &RoiSnapshot) -> Result<RgbImage, CaptureError> {
        let window = self.locate()?;
        let rect = roi.resolve(&window.bounds);
        self.capture_region(rect)
    }

    pub fn capture_full_window(&self) -> Result<(RgbImage, WindowBBox), CaptureError> {
        let window = self.locate()?;
        let image = self.desktop.capture_window(window.id)?;
        Ok((to_rgb(image), window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testing::FakeDesktop;
    use crate::config::Config;
    use crate::roi::{RelativeRoi, RoiSpec, RoiState};

    fn roi() -> RoiSnapshot {
        let state = RoiState::new(&Config::default().roi);
        state.set_override(RoiSpec::Relative(RelativeRoi::new(0.5, 0.5, 1.0, 1.0)));
        state.snapshot()
    }

    #[test]
    fn test_capture_roi_uses_resolved_rectangle() {
        let desktop = Arc::new(FakeDesktop::with_window("DMV-Viewer", 100, 50, 800, 600));
        let grabber = FrameGrabber::new(desktop.clone(), "DMV-Viewer");

        let frame = grabber.capture_roi(&roi()).unwrap();
        assert_eq!(frame.dimensions(), (400, 300));
        assert_eq!(desktop.captured_regions(), vec![Rectangle::new(500, 350, 400, 300)]);
    }

    #[test]
    fn test_capture_roi_reports_missing_window() {
        let grabber = FrameGrabber::new(Arc::new(FakeDesktop::default()), "DMV-Viewer");
        let err = grabber.capture_roi(&roi()).unwrap_err();
        assert!(matches!(err, CaptureError::NotFound { .. }));
    }

    #[test]
    fn test_capture_full_window_returns_bbox() {
        let desktop = Arc::new(FakeDesktop::with_window("DMV-Viewer", 10, 20, 64, 48));
        let grabber = FrameGrabber::new(desktop, "DMV");
        let (frame, bbox) = grabber.capture_full_window().unwrap();
        assert_eq!(frame.dimensions(), (64, 48));
        assert_eq!(bbox.bounds, Rectangle::new(10, 20, 64, 48));
    }

    #[test]
    fn test_capture_failure_propagates() {
        let desktop = FakeDesktop::with_window("DMV-Viewer", 0, 0, 64, 48)
            .failing(CaptureError::Backend("display gone".to_string()));
        let grabber = FrameGrabber::new(Arc::new(desktop), "DMV-Viewer");
        assert_eq!(
            grabber.capture_roi(&roi()).unwrap_err().to_string(),
            "Capture failed: display gone"
        );
    }
}
