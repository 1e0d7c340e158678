//! [`FrameEncoder`] that fails on demand.

use image::error::{LimitError, LimitErrorKind};
use image::{ImageError, RgbImage};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{encode_jpeg, EncodeError, FrameEncoder};

/// Fails the first `failures` calls, then encodes normally.
#[derive(Debug, Default)]
pub struct FlakyEncoder {
    failures: usize,
    calls: AtomicUsize,
}

impl FlakyEncoder {
    pub fn failing(failures: usize) -> Self {
        Self {
            failures,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameEncoder for FlakyEncoder {
    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(EncodeError::from(ImageError::Limits(LimitError::from_kind(
                LimitErrorKind::InsufficientMemory,
            ))));
        }
        encode_jpeg(image, quality)
    }
}
