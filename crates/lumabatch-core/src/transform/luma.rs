//! Luminance-driven alpha: bright pixels become transparent.
//!
//! Each pixel keeps its color; its alpha becomes 255 while the weighted
//! luminance stays below the threshold and fades linearly to 0 above it.
//! Any alpha the source already carried is multiplied in, so existing
//! transparency is never lost.

use crate::pixel::PixelBuffer;

/// Rec. 601 luma weights.
pub const LUMA_COEF_R: f32 = 0.299;
pub const LUMA_COEF_G: f32 = 0.587;
pub const LUMA_COEF_B: f32 = 0.114;

/// Luminance at or above which pixels start to fade.
pub const DEFAULT_LUMA_THRESHOLD: u8 = 200;

/// Channel weights and the fade threshold.
///
/// The weights are not required to sum to 1; luminance is clamped to
/// `[0, 255]` after weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumaParameters {
    pub coef_r: f32,
    pub coef_g: f32,
    pub coef_b: f32,
    pub threshold: u8,
}

impl Default for LumaParameters {
    fn default() -> Self {
        Self {
            coef_r: LUMA_COEF_R,
            coef_g: LUMA_COEF_G,
            coef_b: LUMA_COEF_B,
            threshold: DEFAULT_LUMA_THRESHOLD,
        }
    }
}

impl LumaParameters {
    /// Standard weights with a custom threshold.
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Weighted brightness of one pixel, rounded and clamped to a byte.
    ///
    /// Non-finite weights produce 0.
    pub fn luminance(&self, r: u8, g: u8, b: u8) -> u8 {
        let luma = self.coef_r * f32::from(r)
            + self.coef_g * f32::from(g)
            + self.coef_b * f32::from(b);
        if !luma.is_finite() {
            return 0;
        }
        luma.round().clamp(0.0, 255.0) as u8
    }

    /// Alpha for a luminance value, before the source alpha is applied.
    ///
    /// Above the threshold alpha falls linearly as
    /// `255 - (L - t) * 255 / (255 - t)`, reaching 0 at `L == 255`. The
    /// divisor is at least 1, so a threshold of 255 keeps every level opaque.
    /// The threshold level itself is capped at 254 so it never stays fully
    /// opaque, except when the threshold is 255.
    pub fn luma_alpha(&self, luma: u8) -> u8 {
        if luma < self.threshold {
            return 255;
        }
        if luma == self.threshold && self.threshold < u8::MAX {
            return 254;
        }
        let threshold = u32::from(self.threshold);
        let range = (255 - threshold).max(1);
        let faded = ((u32::from(luma) - threshold) * 255) / range;
        (255 - faded.min(255)) as u8
    }
}

/// Multiply two alphas in 8-bit space, truncating.
pub fn compose_alpha(alpha: u8, source_alpha: u8) -> u8 {
    ((u32::from(alpha) * u32::from(source_alpha)) / 255) as u8
}

/// Run the luminance→alpha transform, always producing RGBA.
///
/// Invalid input yields [`PixelBuffer::invalid`].
pub fn luma_to_alpha(input: &PixelBuffer, params: &LumaParameters) -> PixelBuffer {
    if !input.is_valid() {
        tracing::debug!(
            "Skipping luma transform on invalid buffer ({}x{}x{})",
            input.width(),
            input.height(),
            input.channels()
        );
        return PixelBuffer::invalid();
    }

    let mut samples = Vec::with_capacity(input.pixel_count() * 4);
    for [r, g, b, a] in input.rgba_pixels() {
        let luma = params.luminance(r, g, b);
        let alpha = compose_alpha(params.luma_alpha(luma), a);
        samples.extend_from_slice(&[r, g, b, alpha]);
    }

    PixelBuffer::new(samples, input.width(), input.height(), 4)
}
