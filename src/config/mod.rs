use anyhow::{anyhow, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::roi::{AbsoluteRoi, RelativeRoi, RoiMode};
use crate::stream::StreamSettings;

const MIN_FPS: u32 = 1;
const MAX_FPS: u32 = 60;
const MIN_QUALITY: u8 = 1;
const MAX_QUALITY: u8 = 100;
const MAX_CLAMP: u32 = 4096;

const DEFAULT_FPS: u32 = 10;
const DEFAULT_JPEG_QUALITY: u8 = 70;
const DEFAULT_WINDOW_TITLE: &str = "DMV-Viewer";
const DEFAULT_BIND_IP: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_ABSOLUTE_ROI: AbsoluteRoi = AbsoluteRoi::new(1454, 540, 460, 377);
const DEFAULT_RELATIVE_ROI: RelativeRoi = RelativeRoi::new(0.748713, 0.518234, 0.985582, 0.880038);

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub capture: CaptureConfig,
    pub roi: RoiConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_ip: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Substring that must appear in the target window's title.
    pub window_title: String,
    pub fps: u32,
    pub jpeg_quality: u8,
}

#[derive(Debug, Clone)]
pub struct RoiConfig {
    pub mode: RoiMode,
    pub absolute: AbsoluteRoi,
    pub relative: RelativeRoi,
    /// Pixels trimmed from each side of the resolved ROI.
    pub clamp: u32,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.capture.fps < MIN_FPS || self.capture.fps > MAX_FPS {
            return Err(anyhow!("fps must be between {} and {}", MIN_FPS, MAX_FPS));
        }
        if self.capture.jpeg_quality < MIN_QUALITY || self.capture.jpeg_quality > MAX_QUALITY {
            return Err(anyhow!(
                "jpeg_quality must be between {} and {}",
                MIN_QUALITY,
                MAX_QUALITY
            ));
        }
        if self.capture.window_title.is_empty() {
            return Err(anyhow!("window_title must not be empty"));
        }
        if self.roi.clamp > MAX_CLAMP {
            return Err(anyhow!("roi clamp must be <= {}", MAX_CLAMP));
        }
        let rel = self.roi.relative.as_array();
        if rel.iter().any(|v| !v.is_finite()) {
            return Err(anyhow!("relative ROI values must be finite"));
        }
        Ok(())
    }

    pub fn sanitize(&mut self) {
        self.capture.fps = self.capture.fps.clamp(MIN_FPS, MAX_FPS);
        self.capture.jpeg_quality = self.capture.jpeg_quality.clamp(MIN_QUALITY, MAX_QUALITY);
        self.roi.clamp = self.roi.clamp.min(MAX_CLAMP);
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.bind_ip, self.server.port)
    }

    pub fn stream_settings(&self) -> StreamSettings {
        StreamSettings {
            fps: self.capture.fps,
            jpeg_quality: self.capture.jpeg_quality,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_ip: DEFAULT_BIND_IP,
                port: DEFAULT_PORT,
            },
            capture: CaptureConfig {
                window_title: DEFAULT_WINDOW_TITLE.to_string(),
                fps: DEFAULT_FPS,
                jpeg_quality: DEFAULT_JPEG_QUALITY,
            },
            roi: RoiConfig {
                mode: RoiMode::Relative,
                absolute: DEFAULT_ABSOLUTE_ROI,
                relative: DEFAULT_RELATIVE_ROI,
                clamp: 0,
            },
        }
    }
}
