use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

#[cfg(test)]
pub mod testing;

const MIN_QUALITY: u8 = 1;
const MAX_QUALITY: u8 = 100;

#[derive(Debug, thiserror::Error)]
#[error("JPEG encode failed: {0}")]
pub struct EncodeError(#[from] image::ImageError);

/// Serializes `image` to JPEG. `quality` is clamped into 1..=100.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    let quality = quality.clamp(MIN_QUALITY, MAX_QUALITY);
    let mut buf = Vec::with_capacity(image.as_raw().len() / 8);
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(buf)
}

/// Turns a captured frame into the bytes sent to clients.
pub trait FrameEncoder: Send + Sync {
    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JpegFrameEncoder;

impl FrameEncoder for JpegFrameEncoder {
    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(image, quality)
    }
}
