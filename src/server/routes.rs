use axum::{
    body::{Body, Bytes},
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::thread;
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, StreamExt};
use tracing::{error, info, warn};

use crate::capture::Rectangle;
use crate::encode::EncodeError;
use crate::roi::RoiMode;
use crate::stream::{Disconnected, FrameSink, MjpegStreamer, CONTENT_TYPE};

use super::{frames, pages, roi_request, AppState};

const STREAM_BUFFER: usize = 2;
const STREAM_CACHE_CONTROL: &str = "no-cache, no-store, must-revalidate";
const SNAPSHOT_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, max-age=0";

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("Capture task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for SnapshotError {
    fn into_response(self) -> Response {
        error!(error = %self, "Snapshot request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

async fn blocking_jpeg<F>(build: F) -> Result<Vec<u8>, SnapshotError>
where
    F: FnOnce() -> Result<Vec<u8>, EncodeError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(build).await??)
}

/// Feeds multipart parts from a stream thread into the response body.
struct ChannelSink(mpsc::Sender<Bytes>);

impl FrameSink for ChannelSink {
    fn emit(&mut self, part: Vec<u8>) -> Result<(), Disconnected> {
        self.0.blocking_send(Bytes::from(part)).map_err(|_| Disconnected)
    }

    fn is_connected(&self) -> bool {
        !self.0.is_closed()
    }
}

pub async fn index() -> Html<&'static str> {
    Html(pages::INDEX)
}

pub async fn view_object() -> Html<&'static str> {
    Html(pages::VIEW_OBJECT)
}

pub async fn measure() -> Html<&'static str> {
    Html(pages::MEASURE)
}

pub async fn view_meta() -> Html<String> {
    Html(pages::view_meta(chrono::Utc::now().timestamp_millis()))
}

/// GET /stream.mjpg — one OS thread per client runs the streamer until the
/// body is dropped.
pub async fn stream(State(state): State<AppState>) -> Response {
    let (tx, rx) = mpsc::channel::<Bytes>(STREAM_BUFFER);
    let mut streamer = MjpegStreamer::new(
        state.grabber.clone(),
        state.encoder.clone(),
        state.roi.clone(),
        state.settings,
        state.emit_lock.clone(),
    );

    let spawned = thread::Builder::new()
        .name("mjpeg-stream".to_string())
        .spawn(move || {
            streamer.run(&mut ChannelSink(tx));
            info!("Stream client disconnected");
        });
    if let Err(err) = spawned {
        error!(error = %err, "Failed to start stream thread");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to start stream").into_response();
    }
    info!("Stream client connected");

    let body = Body::from_stream(ReceiverStream::new(rx).map(Ok::<_, Infallible>));
    (
        [
            (header::CONTENT_TYPE, CONTENT_TYPE),
            (header::CACHE_CONTROL, STREAM_CACHE_CONTROL),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
        ],
        body,
    )
        .into_response()
}

pub async fn snapshot(State(state): State<AppState>) -> Result<Response, SnapshotError> {
    let jpeg = blocking_jpeg(move || frames::snapshot_jpeg(&state)).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, SNAPSHOT_CACHE_CONTROL),
            (header::PRAGMA, "no-cache"),
            (header::EXPIRES, "0"),
            (header::CONTENT_DISPOSITION, "inline; filename=snapshot.jpg"),
        ],
        jpeg,
    )
        .into_response())
}

pub async fn full_window(State(state): State<AppState>) -> Result<Response, SnapshotError> {
    let jpeg = blocking_jpeg(move || frames::full_window_jpeg(&state)).await?;
    Ok(jpeg_response(jpeg))
}

pub async fn snapshot_grid(State(state): State<AppState>) -> Result<Response, SnapshotError> {
    let jpeg = blocking_jpeg(move || frames::grid_jpeg(&state)).await?;
    Ok(jpeg_response(jpeg))
}

fn jpeg_response(jpeg: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "image/jpeg"),
            (header::CACHE_CONTROL, SNAPSHOT_CACHE_CONTROL),
        ],
        jpeg,
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct RoiResponse {
    ok: bool,
    message: String,
}

/// GET /set_roi — replaces the runtime ROI override.
pub async fn set_roi(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    match roi_request::parse(&params) {
        Ok(spec) => {
            state.roi.set_override(spec);
            let message = roi_request::applied_message(&spec);
            info!(%message, "ROI override set");
            Json(RoiResponse { ok: true, message }).into_response()
        }
        Err(err) => {
            warn!(error = %err, "Rejected ROI request");
            (
                StatusCode::BAD_REQUEST,
                Json(RoiResponse {
                    ok: false,
                    message: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    ok: bool,
    window: String,
    window_bbox: Rectangle,
    roi_bbox: Rectangle,
    mode: RoiMode,
    runtime_abs: Option<[i32; 4]>,
    runtime_rel: Option<[f64; 4]>,
}

#[derive(Debug, Serialize)]
pub struct HealthFailure {
    ok: bool,
    error: String,
    window_title: String,
}

fn health_report(state: &AppState) -> Result<HealthReport, HealthFailure> {
    let window = state.grabber.locate().map_err(|err| HealthFailure {
        ok: false,
        error: err.to_string(),
        window_title: state.grabber.title().to_string(),
    })?;
    let roi = state.roi.snapshot();

    Ok(HealthReport {
        ok: true,
        roi_bbox: roi.resolve(&window.bounds),
        window: window.title,
        window_bbox: window.bounds,
        mode: roi.mode,
        runtime_abs: roi.runtime_absolute().map(|r| r.as_array()),
        runtime_rel: roi.runtime_relative().map(|r| r.as_array()),
    })
}

/// GET /health — always 200; failures are reported in the payload.
pub async fn health(State(state): State<AppState>) -> Response {
    let title = state.grabber.title().to_string();
    let report = tokio::task::spawn_blocking(move || health_report(&state)).await;

    match report {
        Ok(Ok(report)) => Json(report).into_response(),
        Ok(Err(failure)) => Json(failure).into_response(),
        Err(err) => Json(HealthFailure {
            ok: false,
            error: err.to_string(),
            window_title: title,
        })
        .into_response(),
    }
}
