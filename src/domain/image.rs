//! Model-ready image tensor

use ndarray::{Array4, ArrayView4};

use super::DomainError;

/// Normalized RGB image batch of shape `(1, height, width, 3)`
///
/// Channel values lie in `[0.0, 1.0]`. Built per request by the image
/// processor and dropped after the predict call.
#[derive(Debug, Clone)]
pub struct ImageTensor {
    data: Array4<f32>,
}

impl ImageTensor {
    pub fn new(data: Array4<f32>) -> Result<Self, DomainError> {
        let shape = data.shape();

        if shape[0] != 1 || shape[3] != 3 {
            return Err(DomainError::internal(format!(
                "image tensor must have shape (1, H, W, 3), got {:?}",
                shape
            )));
        }

        if data.iter().any(|v| !(0.0..=1.0).contains(v)) {
            return Err(DomainError::internal(
                "image tensor values must lie in [0.0, 1.0]",
            ));
        }

        Ok(Self { data })
    }

    /// `[batch, height, width, channels]`
    pub fn shape(&self) -> [usize; 4] {
        let s = self.data.shape();
        [s[0], s[1], s[2], s[3]]
    }

    pub fn height(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn width(&self) -> usize {
        self.data.shape()[2]
    }

    pub fn view(&self) -> ArrayView4<'_, f32> {
        self.data.view()
    }

    /// RGB values of the pixel at row `y`, column `x`
    pub fn pixel(&self, y: usize, x: usize) -> [f32; 3] {
        [
            self.data[[0, y, x, 0]],
            self.data[[0, y, x, 1]],
            self.data[[0, y, x, 2]],
        ]
    }

    /// Per-channel mean over the whole image
    pub fn mean_rgb(&self) -> [f32; 3] {
        let pixels = (self.height() * self.width()).max(1) as f32;
        let mut sums = [0.0f32; 3];

        for ((_, _, _, channel), value) in self.data.indexed_iter() {
            sums[channel] += *value;
        }

        sums.map(|sum| sum / pixels)
    }
}
