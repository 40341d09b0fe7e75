//! Leaf image preprocessing: decode, flatten to RGB, resize, normalize

use bytes::Bytes;
use image::imageops::{self, FilterType};
use ndarray::Array4;
use tracing::debug;

use crate::domain::{DomainError, ImageTensor};

/// Input resolution expected by the disease model
pub const TARGET_SIZE: u32 = 224;

/// Fixed preprocessing pipeline producing `(1, H, W, 3)` tensors in `[0, 1]`
#[derive(Debug, Clone, Copy)]
pub struct ImageProcessor {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new(TARGET_SIZE, TARGET_SIZE)
    }
}

impl ImageProcessor {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: FilterType::CatmullRom,
        }
    }

    /// `(width, height)` of every produced tensor
    pub fn target_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Run the whole pipeline synchronously
    ///
    /// Aspect ratio is not preserved. Alpha is dropped, grayscale is expanded.
    pub fn process(&self, raw: &[u8]) -> Result<ImageTensor, DomainError> {
        if raw.is_empty() {
            return Err(DomainError::image_decode("Image data is empty"));
        }

        let decoded = image::load_from_memory(raw)
            .map_err(|e| DomainError::image_decode(format!("Invalid image data: {}", e)))?;

        debug!(
            width = decoded.width(),
            height = decoded.height(),
            color = ?decoded.color(),
            "Decoded image"
        );

        let rgb = decoded.to_rgb8();
        let resized = imageops::resize(&rgb, self.width, self.height, self.filter);

        let data = Array4::from_shape_fn(
            (1, self.height as usize, self.width as usize, 3),
            |(_, y, x, c)| f32::from(resized.get_pixel(x as u32, y as u32)[c]) / 255.0,
        );

        ImageTensor::new(data)
    }

    /// Run the pipeline on the blocking pool
    pub async fn process_async(&self, raw: Bytes) -> Result<ImageTensor, DomainError> {
        let processor = *self;

        tokio::task::spawn_blocking(move || processor.process(&raw))
            .await
            .map_err(|e| DomainError::internal(format!("Image processing task failed: {}", e)))?
    }

    /// Whether `process` would accept these bytes
    pub fn validate(&self, raw: &[u8]) -> bool {
        !raw.is_empty() && image::load_from_memory(raw).is_ok()
    }
}
