use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

use crate::capture::FrameGrabber;
use crate::encode::FrameEncoder;
use crate::roi::RoiState;

use super::{multipart_part, roi_frame, StreamSettings, StreamState};

const ENCODE_RETRY_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disconnected;

/// Destination for multipart sections, normally one HTTP response body.
pub trait FrameSink {
    fn emit(&mut self, part: Vec<u8>) -> Result<(), Disconnected>;

    fn is_connected(&self) -> bool {
        true
    }
}

/// Capture → encode → emit loop serving one client.
pub struct MjpegStreamer {
    grabber: FrameGrabber,
    encoder: Arc<dyn FrameEncoder>,
    roi: Arc<RoiState>,
    settings: StreamSettings,
    emit_lock: Arc<Mutex<()>>,
    state: StreamState,
}

impl MjpegStreamer {
    pub fn new(
        grabber: FrameGrabber,
        encoder: Arc<dyn FrameEncoder>,
        roi: Arc<RoiState>,
        settings: StreamSettings,
        emit_lock: Arc<Mutex<()>>,
    ) -> Self {
        Self {
            grabber,
            encoder,
            roi,
            settings,
            emit_lock,
            state: StreamState::Idle,
        }
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Runs until `sink` reports the client gone. Blocks the calling thread.
    pub fn run<S: FrameSink>(&mut self, sink: &mut S) {
        let frame_interval = self.settings.frame_interval();
        let mut frames: u64 = 0;
        debug!(fps = self.settings.fps, "MJPEG stream started");

        while sink.is_connected() {
            let frame_start = Instant::now();

            self.state = StreamState::Capturing;
            let (image, capture_err) = roi_frame(&self.grabber, &self.roi.snapshot());
            if let Some(err) = capture_err {
                warn!(error = %err, "Frame error");
            }

            self.state = StreamState::Encoding;
            let jpeg = match self.encoder.encode(&image, self.settings.jpeg_quality) {
                Ok(jpeg) => jpeg,
                Err(err) => {
                    error!(error = %err, "JPEG encode error");
                    thread::sleep(ENCODE_RETRY_DELAY);
                    continue;
                }
            };

            self.state = StreamState::Emitting;
            let sent = {
                let _guard = self.emit_lock.lock().unwrap_or_else(|e| e.into_inner());
                sink.emit(multipart_part(&jpeg))
            };
            if sent.is_err() {
                break;
            }
            frames += 1;

            let elapsed = frame_start.elapsed();
            if elapsed < frame_interval {
                thread::sleep(frame_interval - elapsed);
            }
        }

        self.state = StreamState::Idle;
        debug!(frames, "MJPEG stream ended");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testing::FakeDesktop;
    use crate::config::Config;
    use crate::encode::testing::FlakyEncoder;
    use crate::encode::JpegFrameEncoder;
    use crate::overlay;
    use std::sync::Arc;

    struct VecSink {
        parts: Vec<Vec<u8>>,
        limit: usize,
    }

    impl FrameSink for VecSink {
        fn emit(&mut self, part: Vec<u8>) -> Result<(), Disconnected> {
            if self.parts.len() >= self.limit {
                return Err(Disconnected);
            }
            self.parts.push(part);
            Ok(())
        }
    }

    fn streamer(desktop: FakeDesktop, fps: u32) -> MjpegStreamer {
        MjpegStreamer::new(
            FrameGrabber::new(Arc::new(desktop), "DMV-Viewer"),
            Arc::new(JpegFrameEncoder),
            Arc::new(RoiState::new(&Config::default().roi)),
            StreamSettings {
                fps,
                jpeg_quality: 70,
            },
            Arc::new(Mutex::new(())),
        )
    }

    fn jpeg_of(part: &[u8]) -> image::DynamicImage {
        let start = part
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator")
            + 4;
        image::load_from_memory(&part[start..part.len() - 2]).expect("valid jpeg")
    }

    #[test]
    fn test_stops_when_client_disconnects() {
        let desktop = FakeDesktop::with_window("DMV-Viewer", 0, 0, 1000, 1000);
        let mut streamer = streamer(desktop, 60);
        let mut sink = VecSink {
            parts: Vec::new(),
            limit: 3,
        };

        streamer.run(&mut sink);

        assert_eq!(sink.parts.len(), 3);
        assert_eq!(streamer.state(), StreamState::Idle);
        for part in &sink.parts {
            assert!(part.starts_with(b"--frame\r\nContent-Type: image/jpeg\r\n"));
            assert_eq!(jpeg_of(part).width(), 237);
        }
    }

    #[test]
    fn test_paces_to_frame_rate() {
        let desktop = FakeDesktop::with_window("DMV-Viewer", 0, 0, 200, 200);
        let mut streamer = streamer(desktop, 20);
        let mut sink = VecSink {
            parts: Vec::new(),
            limit: 3,
        };

        let start = Instant::now();
        streamer.run(&mut sink);
        assert!(start.elapsed() >= Duration::from_millis(140));
    }

    #[test]
    fn test_missing_window_streams_placeholder() {
        let mut streamer = streamer(FakeDesktop::default(), 60);
        let mut sink = VecSink {
            parts: Vec::new(),
            limit: 1,
        };

        streamer.run(&mut sink);

        let frame = jpeg_of(&sink.parts[0]);
        assert_eq!(
            (frame.width(), frame.height()),
            (overlay::PLACEHOLDER_WIDTH, overlay::PLACEHOLDER_HEIGHT)
        );
    }

    #[test]
    fn test_disconnected_sink_never_captures() {
        struct ClosedSink;
        impl FrameSink for ClosedSink {
            fn emit(&mut self, _part: Vec<u8>) -> Result<(), Disconnected> {
                panic!("emit on closed sink");
            }
            fn is_connected(&self) -> bool {
                false
            }
        }

        let desktop = Arc::new(FakeDesktop::with_window("DMV-Viewer", 0, 0, 100, 100));
        let mut streamer = MjpegStreamer::new(
            FrameGrabber::new(desktop.clone(), "DMV-Viewer"),
            Arc::new(JpegFrameEncoder),
            Arc::new(RoiState::new(&Config::default().roi)),
            Config::default().stream_settings(),
            Arc::new(Mutex::new(())),
        );
        streamer.run(&mut ClosedSink);
        assert!(desktop.captured_regions().is_empty());
    }

    #[test]
    fn test_encode_failure_skips_frame_and_retries() {
        let encoder = Arc::new(FlakyEncoder::failing(2));
        let mut streamer = MjpegStreamer::new(
            FrameGrabber::new(
                Arc::new(FakeDesktop::with_window("DMV-Viewer", 0, 0, 1000, 1000)),
                "DMV-Viewer",
            ),
            encoder.clone(),
            Arc::new(RoiState::new(&Config::default().roi)),
            StreamSettings {
                fps: 60,
                jpeg_quality: 70,
            },
            Arc::new(Mutex::new(())),
        );
        let mut sink = VecSink {
            parts: Vec::new(),
            limit: 1,
        };

        let start = Instant::now();
        streamer.run(&mut sink);

        assert!(start.elapsed() >= ENCODE_RETRY_DELAY * 2);
        // Two failed iterations emitted nothing, the third went out, the
        // fourth hit the disconnected sink.
        assert_eq!(encoder.calls(), 4);
        assert_eq!(sink.parts.len(), 1);
        assert_eq!(jpeg_of(&sink.parts[0]).width(), 237);
    }
}
