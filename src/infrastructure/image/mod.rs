//! Image preprocessing infrastructure

mod processor;

pub use processor::{ImageProcessor, TARGET_SIZE};
#[cfg(test)]
pub(crate) use processor::test_images;
