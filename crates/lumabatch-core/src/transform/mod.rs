//! Per-image pixel transforms.
//!
//! Every transform is a pure function from one [`PixelBuffer`] to a new one,
//! so any worker thread can run it without coordination.

pub mod luma;

pub use luma::{compose_alpha, luma_to_alpha, LumaParameters};

use crate::pixel::PixelBuffer;

/// The transform applied to every file of a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transform {
    /// Luminance → alpha with the given weights and threshold
    LumaToAlpha(LumaParameters),
    /// Re-encode as PNG without touching pixels
    ConvertToPng,
}

impl Default for Transform {
    fn default() -> Self {
        Self::LumaToAlpha(LumaParameters::default())
    }
}

impl Transform {
    /// Apply the transform. Invalid input always produces an invalid buffer.
    pub fn apply(&self, input: &PixelBuffer) -> PixelBuffer {
        match self {
            Self::LumaToAlpha(params) => luma_to_alpha(input, params),
            Self::ConvertToPng => convert_to_png(input),
        }
    }

    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LumaToAlpha(_) => "luma2alpha",
            Self::ConvertToPng => "png",
        }
    }
}

/// Pass-through: the format change happens when the result is encoded.
pub fn convert_to_png(input: &PixelBuffer) -> PixelBuffer {
    if input.is_valid() {
        input.clone()
    } else {
        PixelBuffer::invalid()
    }
}
