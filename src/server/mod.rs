//! HTTP surface: viewer pages, the MJPEG stream, snapshots and ROI control.

mod frames;
mod pages;
mod roi_request;
mod routes;

use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::capture::{Desktop, FrameGrabber, XcapDesktop};
use crate::config::Config;
use crate::encode::{FrameEncoder, JpegFrameEncoder};
use crate::roi::RoiState;
use crate::stream::StreamSettings;

/// Shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub grabber: FrameGrabber,
    pub encoder: Arc<dyn FrameEncoder>,
    pub roi: Arc<RoiState>,
    pub settings: StreamSettings,
    /// Held only while a stream thread hands a finished part to its client.
    pub emit_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(
        config: &Config,
        desktop: Arc<dyn Desktop>,
        encoder: Arc<dyn FrameEncoder>,
    ) -> Self {
        Self {
            grabber: FrameGrabber::new(desktop, config.capture.window_title.clone()),
            encoder,
            roi: Arc::new(RoiState::new(&config.roi)),
            settings: config.stream_settings(),
            emit_lock: Arc::new(Mutex::new(())),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/stream.mjpg", get(routes::stream))
        .route("/snapshot.jpg", get(routes::snapshot))
        .route("/full_window.jpg", get(routes::full_window))
        .route("/snapshot_grid.jpg", get(routes::snapshot_grid))
        .route("/view_meta", get(routes::view_meta))
        .route("/view_object", get(routes::view_object))
        .route("/measure", get(routes::measure))
        .route("/set_roi", get(routes::set_roi))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the configured address and serves until the process is killed.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.socket_addr();
    let state = AppState::new(&config, Arc::new(XcapDesktop), Arc::new(JpegFrameEncoder));
    let app = router(state);

    info!(
        %addr,
        window = %config.capture.window_title,
        fps = config.capture.fps,
        quality = config.capture.jpeg_quality,
        mode = %config.roi.mode,
        "Serving window stream"
    );
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
